use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::cache::invalidate_cart;
use crate::domain::cache::Cache;
use crate::domain::cart::command::CartMutationCommand;
use crate::domain::cart::errors::CartError;
use crate::domain::cart::model::NewCartLineItem;
use crate::domain::cart::repository::{CartRepository, CreateOutcome};
use crate::domain::cart::use_cases::apply_mutation::{
    ApplyCartMutationParams, ApplyCartMutationUseCase, ApplyOutcome,
};
use crate::domain::logger::Logger;
use crate::domain::product::repository::ProductRepository;

/// Consumer side of the pipeline: turns one delivered command into a stored line item.
///
/// The broker message id is recorded with the row so that a redelivery of a command
/// whose insert already committed does not create a second row. When
/// `revalidate_stock` is set the product is read again before the insert, closing the
/// window between the producer's advisory check and the write.
pub struct ApplyCartMutationUseCaseImpl {
    pub repository: Arc<dyn CartRepository>,
    pub product_repository: Arc<dyn ProductRepository>,
    pub cache: Arc<dyn Cache>,
    pub logger: Arc<dyn Logger>,
    pub revalidate_stock: bool,
}

impl ApplyCartMutationUseCaseImpl {
    async fn already_applied(&self, message_id: Uuid) -> Result<bool, CartError> {
        self.repository.was_applied(message_id).await.map_err(|e| {
            self.logger.error(&format!(
                "Failed to look up applied cart message message_id={} error_code=REPOSITORY_ERROR error={}",
                message_id, e
            ));
            CartError::Repository(e)
        })
    }

    async fn ensure_stock(&self, command: &CartMutationCommand) -> Result<(), CartError> {
        let product = self
            .product_repository
            .get_by_id(command.product_id)
            .await
            .map_err(CartError::from_product_lookup)?;

        if !product.has_stock_for(command.quantity) {
            self.logger.warn(&format!(
                "Insufficient stock at apply time user_id={} product_id={} stock={} quantity={} error_code=INSUFFICIENT_STOCK",
                command.user_id, command.product_id, product.stock, command.quantity
            ));
            return Err(CartError::InsufficientStock);
        }
        Ok(())
    }
}

#[async_trait]
impl ApplyCartMutationUseCase for ApplyCartMutationUseCaseImpl {
    async fn execute(&self, params: ApplyCartMutationParams) -> Result<ApplyOutcome, CartError> {
        let command = CartMutationCommand::decode(&params.content_type, &params.payload)
            .inspect_err(|e| {
                self.logger.warn(&format!(
                    "Failed to decode cart message message_id={} error_code=MALFORMED_MESSAGE error={}",
                    params.message_id, e
                ));
            })?;

        let item = NewCartLineItem::new(command.user_id, command.product_id, command.quantity)
            .inspect_err(|_| {
                self.logger.warn(&format!(
                    "Invalid quantity in cart message message_id={} quantity={} error_code=INVALID_QUANTITY",
                    params.message_id, command.quantity
                ));
            })?;

        if self.revalidate_stock {
            // A redelivery of a committed insert must not be judged against current stock.
            if self.already_applied(params.message_id).await? {
                invalidate_cart(self.cache.as_ref(), self.logger.as_ref(), command.user_id).await;
                self.logger.info(&format!(
                    "Cart message already applied message_id={} user_id={}",
                    params.message_id, command.user_id
                ));
                return Ok(ApplyOutcome::AlreadyApplied);
            }
            self.ensure_stock(&command).await?;
        }

        let outcome = self
            .repository
            .create(&item, Some(params.message_id))
            .await
            .map_err(|e| {
                // The store reports a dangling product reference as not-found.
                let error = CartError::from_product_lookup(e);
                self.logger.error(&format!(
                    "Failed to add cart item message_id={} user_id={} product_id={} error_code={} error={}",
                    params.message_id,
                    command.user_id,
                    command.product_id,
                    error.code(),
                    error
                ));
                error
            })?;

        invalidate_cart(self.cache.as_ref(), self.logger.as_ref(), command.user_id).await;

        match outcome {
            CreateOutcome::Created(stored) => {
                self.logger.info(&format!(
                    "Processed cart item message_id={} cart_id={} user_id={} product_id={} quantity={}",
                    params.message_id, stored.id, stored.user_id, stored.product_id, stored.quantity
                ));
                Ok(ApplyOutcome::Applied(stored))
            }
            CreateOutcome::AlreadyApplied => {
                self.logger.info(&format!(
                    "Cart message already applied message_id={} user_id={}",
                    params.message_id, command.user_id
                ));
                Ok(ApplyOutcome::AlreadyApplied)
            }
        }
    }
}
