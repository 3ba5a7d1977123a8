use async_trait::async_trait;

use crate::domain::cart::errors::CartError;
use crate::domain::shared::value_objects::{CartItemId, UserId};

#[derive(Debug, Clone)]
pub struct DeleteCartItemParams {
    pub id: CartItemId,
    pub user_id: UserId,
}

#[async_trait]
pub trait DeleteCartItemUseCase: Send + Sync {
    async fn execute(&self, params: DeleteCartItemParams) -> Result<(), CartError>;
}
