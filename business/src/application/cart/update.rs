use std::sync::Arc;

use async_trait::async_trait;

use super::cache::invalidate_cart;
use crate::domain::cache::Cache;
use crate::domain::cart::errors::CartError;
use crate::domain::cart::model::CartLineItem;
use crate::domain::cart::repository::CartRepository;
use crate::domain::cart::use_cases::update::{UpdateCartItemParams, UpdateCartItemUseCase};
use crate::domain::logger::Logger;
use crate::domain::product::repository::ProductRepository;

/// Synchronous quantity change of a single line item.
pub struct UpdateCartItemUseCaseImpl {
    pub repository: Arc<dyn CartRepository>,
    pub product_repository: Arc<dyn ProductRepository>,
    pub cache: Arc<dyn Cache>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl UpdateCartItemUseCase for UpdateCartItemUseCaseImpl {
    async fn execute(&self, params: UpdateCartItemParams) -> Result<CartLineItem, CartError> {
        let existing = self
            .repository
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
            })?
            .item;

        let updated = existing.with_quantity(params.quantity).inspect_err(|_| {
            self.logger.warn(&format!(
                "Invalid quantity cart_id={} quantity={} error_code=INVALID_QUANTITY",
                params.id, params.quantity
            ));
        })?;

        let product = self
            .product_repository
            .get_by_id(existing.product_id)
            .await
            .map_err(|e| {
                let error = CartError::from_product_lookup(e);
                self.logger.warn(&format!(
                    "Product lookup failed product_id={} error_code={}",
                    existing.product_id,
                    error.code()
                ));
                error
            })?;

        if !product.has_stock_for(params.quantity) {
            self.logger.warn(&format!(
                "Insufficient stock product_id={} stock={} quantity={} error_code=INSUFFICIENT_STOCK",
                product.id, product.stock, params.quantity
            ));
            return Err(CartError::InsufficientStock);
        }

        self.repository.update(&updated).await.map_err(|e| {
            // NotFound here means the item was deleted after the lookup.
            let error = CartError::from_item_lookup(e);
            self.logger.error(&format!(
                "Failed to update cart item cart_id={} error_code={} error={}",
                params.id,
                error.code(),
                error
            ));
            error
        })?;

        invalidate_cart(self.cache.as_ref(), self.logger.as_ref(), updated.user_id).await;

        self.logger.info(&format!(
            "Updated cart item cart_id={} user_id={} quantity={}",
            updated.id, updated.user_id, updated.quantity
        ));
        Ok(updated)
    }
}
