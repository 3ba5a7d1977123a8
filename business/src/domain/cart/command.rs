use serde::{Deserialize, Serialize};

use crate::domain::broker::JSON_CONTENT_TYPE;
use crate::domain::shared::value_objects::{ProductId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandDecodeError {
    #[error("cart_command.unsupported_content_type: {0}")]
    UnsupportedContentType(String),
    #[error("cart_command.invalid_payload: {0}")]
    InvalidPayload(String),
}

/// Wire payload of a cart-add request.
///
/// Immutable once published. Unknown and missing fields are rejected so that a
/// payload from an incompatible producer is never half-applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CartMutationCommand {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i32,
}

impl CartMutationCommand {
    pub fn new(user_id: UserId, product_id: ProductId, quantity: i32) -> Self {
        Self {
            user_id,
            product_id,
            quantity,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn decode(content_type: &str, payload: &[u8]) -> Result<Self, CommandDecodeError> {
        // Producers may append parameters such as "; charset=utf-8".
        let media_type = content_type.split(';').next().unwrap_or_default().trim();
        if !media_type.eq_ignore_ascii_case(JSON_CONTENT_TYPE) {
            return Err(CommandDecodeError::UnsupportedContentType(
                content_type.to_string(),
            ));
        }

        serde_json::from_slice(payload)
            .map_err(|e| CommandDecodeError::InvalidPayload(e.to_string()))
    }
}
