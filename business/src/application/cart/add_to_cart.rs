use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::broker::{JSON_CONTENT_TYPE, MessagePublisher};
use crate::domain::cart::command::CartMutationCommand;
use crate::domain::cart::errors::CartError;
use crate::domain::cart::use_cases::add_to_cart::{AddToCartParams, AddToCartUseCase};
use crate::domain::logger::Logger;
use crate::domain::product::repository::ProductRepository;

/// Producer side of the pipeline. Never writes to the cart store.
///
/// `queue` must name the queue the workers consume.
pub struct AddToCartUseCaseImpl {
    pub product_repository: Arc<dyn ProductRepository>,
    pub publisher: Arc<dyn MessagePublisher>,
    pub logger: Arc<dyn Logger>,
    pub queue: String,
}

#[async_trait]
impl AddToCartUseCase for AddToCartUseCaseImpl {
    async fn execute(&self, params: AddToCartParams) -> Result<CartMutationCommand, CartError> {
        if params.quantity <= 0 {
            self.logger.warn(&format!(
                "Invalid quantity user_id={} quantity={} error_code=INVALID_QUANTITY",
                params.user_id, params.quantity
            ));
            return Err(CartError::InvalidQuantity);
        }

        let product = self
            .product_repository
            .get_by_id(params.product_id)
            .await
            .map_err(|e| {
                let error = CartError::from_product_lookup(e);
                self.logger.warn(&format!(
                    "Product lookup failed product_id={} error_code={}",
                    params.product_id,
                    error.code()
                ));
                error
            })?;

        // Advisory only: stock may change before a worker applies the command.
        if !product.has_stock_for(params.quantity) {
            self.logger.warn(&format!(
                "Insufficient stock product_id={} stock={} quantity={} error_code=INSUFFICIENT_STOCK",
                product.id, product.stock, params.quantity
            ));
            return Err(CartError::InsufficientStock);
        }

        let command = CartMutationCommand::new(params.user_id, params.product_id, params.quantity);
        let body = command.encode().map_err(|e| {
            self.logger.error(&format!(
                "Failed to encode cart command user_id={} error_code=ENCODE_FAILED error={}",
                params.user_id, e
            ));
            CartError::EncodeFailed
        })?;

        let message_id = self
            .publisher
            .publish(&self.queue, JSON_CONTENT_TYPE, &body)
            .await
            .map_err(|e| {
                self.logger.error(&format!(
                    "Failed to publish cart command user_id={} product_id={} error_code=PUBLISH_FAILED error={}",
                    params.user_id, params.product_id, e
                ));
                CartError::PublishFailed(e)
            })?;

        self.logger.info(&format!(
            "Enqueued add to cart message_id={} user_id={} product_id={} quantity={}",
            message_id, command.user_id, command.product_id, command.quantity
        ));
        Ok(command)
    }
}
