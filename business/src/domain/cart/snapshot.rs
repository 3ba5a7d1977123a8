use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::model::CartEntry;
use crate::domain::shared::value_objects::UserId;

/// How long a cached cart may be served before it is re-read from the store.
pub const CART_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

pub fn cart_cache_key(user_id: UserId) -> String {
    format!("cart:{}", user_id)
}

/// Cached view of a user's cart. Disposable; the store stays authoritative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartSnapshot {
    pub entries: Vec<CartEntry>,
}

impl CartSnapshot {
    pub fn new(entries: Vec<CartEntry>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
