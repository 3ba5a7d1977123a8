use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::RepositoryError;
use crate::domain::shared::value_objects::{CartItemId, UserId};

use super::model::{CartEntry, CartLineItem, NewCartLineItem};

/// Result of an idempotent insert.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Created(CartLineItem),
    /// A row produced by the same source message already exists.
    AlreadyApplied,
}

#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Inserts a line item. When `source_message_id` is given, a second insert carrying
    /// the same id is a no-op reported as `AlreadyApplied`.
    async fn create(
        &self,
        item: &NewCartLineItem,
        source_message_id: Option<Uuid>,
    ) -> Result<CreateOutcome, RepositoryError>;
    /// Live items of a user joined with product data, oldest first.
    /// Whether a line item was already created from this broker message.
    async fn was_applied(&self, source_message_id: Uuid) -> Result<bool, RepositoryError>;
    async fn get_by_user(&self, user_id: UserId) -> Result<Vec<CartEntry>, RepositoryError>;
    /// A live item owned by `user_id`; `NotFound` otherwise.
    async fn get_by_id(
        &self,
        id: CartItemId,
        user_id: UserId,
    ) -> Result<CartEntry, RepositoryError>;
    async fn update(&self, item: &CartLineItem) -> Result<(), RepositoryError>;
    /// Soft-deletes a live item owned by `user_id`.
    async fn delete(&self, id: CartItemId, user_id: UserId) -> Result<(), RepositoryError>;
}
