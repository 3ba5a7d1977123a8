use std::sync::Arc;

use async_trait::async_trait;

use super::cache::{load_cart, store_cart};
use crate::domain::cache::Cache;
use crate::domain::cart::errors::CartError;
use crate::domain::cart::repository::CartRepository;
use crate::domain::cart::snapshot::CartSnapshot;
use crate::domain::cart::use_cases::get_cart::{GetCartParams, GetCartUseCase};
use crate::domain::logger::Logger;

/// Cache-aside read of a user's cart.
///
/// The cache is consulted first. On a miss (or an unreadable entry) the store is read and,
/// when the cart is not empty, the result is cached for [`CART_CACHE_TTL`]. Cache failures
/// never fail the request.
///
/// [`CART_CACHE_TTL`]: crate::domain::cart::snapshot::CART_CACHE_TTL
pub struct GetCartUseCaseImpl {
    pub repository: Arc<dyn CartRepository>,
    pub cache: Arc<dyn Cache>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl GetCartUseCase for GetCartUseCaseImpl {
    async fn execute(&self, params: GetCartParams) -> Result<CartSnapshot, CartError> {
        if let Some(snapshot) =
            load_cart(self.cache.as_ref(), self.logger.as_ref(), params.user_id).await
        {
            self.logger.info(&format!(
                "Fetched cart from cache user_id={} count={}",
                params.user_id,
                snapshot.len()
            ));
            return Ok(snapshot);
        }

        let entries = self
            .repository
            .get_by_user(params.user_id)
            .await
            .map_err(|e| {
                self.logger.error(&format!(
                    "Failed to fetch cart user_id={} error_code=FETCH_CART_FAILED error={}",
                    params.user_id, e
                ));
                CartError::Repository(e)
            })?;

        let snapshot = CartSnapshot::new(entries);
        if !snapshot.is_empty() {
            store_cart(
                self.cache.as_ref(),
                self.logger.as_ref(),
                params.user_id,
                &snapshot,
            )
            .await;
        }

        self.logger.info(&format!(
            "Fetched cart user_id={} count={}",
            params.user_id,
            snapshot.len()
        ));
        Ok(snapshot)
    }
}
