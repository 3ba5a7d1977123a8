use std::sync::Arc;

use async_trait::async_trait;

use super::cache::invalidate_cart;
use crate::domain::cache::Cache;
use crate::domain::cart::errors::CartError;
use crate::domain::cart::repository::CartRepository;
use crate::domain::cart::use_cases::delete::{DeleteCartItemParams, DeleteCartItemUseCase};
use crate::domain::errors::RepositoryError;
use crate::domain::logger::Logger;

pub struct DeleteCartItemUseCaseImpl {
    pub repository: Arc<dyn CartRepository>,
    pub cache: Arc<dyn Cache>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl DeleteCartItemUseCase for DeleteCartItemUseCaseImpl {
    async fn execute(&self, params: DeleteCartItemParams) -> Result<(), CartError> {
        // Verify it exists
        self.repository
            .get_by_id(params.id, params.user_id)
            .await
            .map_err(|e| {
                let error = CartError::from_item_lookup(e);
                self.logger.warn(&format!(
                    "Cart item lookup failed cart_id={} error_code={}",
                    params.id,
                    error.code()
                ));
                error
            })?;

        self.repository
            .delete(params.id, params.user_id)
            .await
            .map_err(|e| match e {
                // Deleted concurrently between the lookup and the write.
                RepositoryError::NotFound => CartError::CartItemNotFound,
                other => {
                    self.logger.error(&format!(
                        "Failed to delete cart item cart_id={} error_code=DELETE_CART_FAILED error={}",
                        params.id, other
                    ));
                    CartError::Repository(other)
                }
            })?;

        invalidate_cart(self.cache.as_ref(), self.logger.as_ref(), params.user_id).await;

        self.logger.info(&format!(
            "Deleted cart item cart_id={} user_id={}",
            params.id, params.user_id
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::value_objects::{CartItemId, UserId};
    use crate::test_support::{MockCartRepo, MockKvCache, cart_entry, mock_logger};

    fn params() -> DeleteCartItemParams {
        DeleteCartItemParams {
            id: CartItemId::new(10),
            user_id: UserId::new(1),
        }
    }

    #[tokio::test]
    async fn should_delete_existing_item_and_invalidate_cache() {
        let mut repository = MockCartRepo::new();
        repository
            .expect_get_by_id()
            .returning(|_, _| Ok(cart_entry(10, 1, 5, 2)));
        repository.expect_delete().times(1).returning(|_, _| Ok(()));
        let mut cache = MockKvCache::new();
        cache
            .expect_delete()
            .withf(|key| key.to_string() == "cart:1")
            .times(1)
            .returning(|_| Ok(()));

        let use_case = DeleteCartItemUseCaseImpl {
            repository: Arc::new(repository),
            cache: Arc::new(cache),
            logger: mock_logger(),
        };

        let result = use_case.execute(params()).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn should_return_not_found_when_deleting_nonexistent() {
        let mut repository = MockCartRepo::new();
        repository
            .expect_get_by_id()
            .returning(|_, _| Err(RepositoryError::NotFound));
        repository.expect_delete().never();
        let mut cache = MockKvCache::new();
        cache.expect_delete().never();

        let use_case = DeleteCartItemUseCaseImpl {
            repository: Arc::new(repository),
            cache: Arc::new(cache),
            logger: mock_logger(),
        };

        let result = use_case.execute(params()).await;

        assert!(matches!(result.unwrap_err(), CartError::CartItemNotFound));
    }

    #[tokio::test]
    async fn should_fail_when_store_write_fails() {
        let mut repository = MockCartRepo::new();
        repository
            .expect_get_by_id()
            .returning(|_, _| Ok(cart_entry(10, 1, 5, 2)));
        repository
            .expect_delete()
            .returning(|_, _| Err(RepositoryError::DatabaseError));
        let mut cache = MockKvCache::new();
        cache.expect_delete().never();

        let use_case = DeleteCartItemUseCaseImpl {
            repository: Arc::new(repository),
            cache: Arc::new(cache),
            logger: mock_logger(),
        };

        let result = use_case.execute(params()).await;

        assert!(matches!(
            result.unwrap_err(),
            CartError::Repository(RepositoryError::DatabaseError)
        ));
    }
}
