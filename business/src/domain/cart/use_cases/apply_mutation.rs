use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::cart::errors::CartError;
use crate::domain::cart::model::CartLineItem;

#[derive(Debug, Clone)]
pub struct ApplyCartMutationParams {
    /// Broker message id, used as the idempotency key of the insert.
    pub message_id: Uuid,
    pub content_type: String,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    Applied(CartLineItem),
    /// A previous delivery of the same message already committed its row.
    AlreadyApplied,
}

/// Applies one delivered cart command to the store and invalidates the user's cache entry.
#[async_trait]
pub trait ApplyCartMutationUseCase: Send + Sync {
    async fn execute(&self, params: ApplyCartMutationParams) -> Result<ApplyOutcome, CartError>;
}
