use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::cart::errors::CartError;
use crate::domain::cart::model::CartEntry;
use crate::domain::cart::repository::CartRepository;
use crate::domain::cart::use_cases::get_item::{GetCartItemParams, GetCartItemUseCase};
use crate::domain::logger::Logger;

pub struct GetCartItemUseCaseImpl {
    pub repository: Arc<dyn CartRepository>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl GetCartItemUseCase for GetCartItemUseCaseImpl {
    async fn execute(&self, params: GetCartItemParams) -> Result<CartEntry, CartError> {
        let entry = self
            .repository
            .get_by_id(params.id, params.user_id)
            .await
            .map_err(|e| {
                let error = CartError::from_item_lookup(e);
                self.logger.warn(&format!(
                    "Cart item lookup failed cart_id={} user_id={} error_code={}",
                    params.id,
                    params.user_id,
                    error.code()
                ));
                error
            })?;

        self.logger.info(&format!(
            "Fetched cart item cart_id={} user_id={}",
            params.id, params.user_id
        ));
        Ok(entry)
    }
}
