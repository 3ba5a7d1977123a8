use async_trait::async_trait;

use crate::domain::cart::errors::CartError;
use crate::domain::cart::model::CartEntry;
use crate::domain::shared::value_objects::{CartItemId, UserId};

#[derive(Debug, Clone)]
pub struct GetCartItemParams {
    pub id: CartItemId,
    pub user_id: UserId,
}

#[async_trait]
pub trait GetCartItemUseCase: Send + Sync {
    async fn execute(&self, params: GetCartItemParams) -> Result<CartEntry, CartError>;
}
