use async_trait::async_trait;

use crate::domain::cart::command::CartMutationCommand;
use crate::domain::cart::errors::CartError;
use crate::domain::shared::value_objects::{ProductId, UserId};

#[derive(Debug, Clone)]
pub struct AddToCartParams {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Validates a cart-add request and enqueues it. Success means "accepted", not "applied".
#[async_trait]
pub trait AddToCartUseCase: Send + Sync {
    async fn execute(&self, params: AddToCartParams) -> Result<CartMutationCommand, CartError>;
}
