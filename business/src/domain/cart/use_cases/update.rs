use async_trait::async_trait;

use crate::domain::cart::errors::CartError;
use crate::domain::cart::model::CartLineItem;
use crate::domain::shared::value_objects::{CartItemId, UserId};

#[derive(Debug, Clone)]
pub struct UpdateCartItemParams {
    pub id: CartItemId,
    pub user_id: UserId,
    pub quantity: i32,
}

#[async_trait]
pub trait UpdateCartItemUseCase: Send + Sync {
    async fn execute(&self, params: UpdateCartItemParams) -> Result<CartLineItem, CartError>;
}
