use crate::domain::broker::BrokerError;
use crate::domain::errors::RepositoryError;

/// Failure classes the pipeline branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected synchronously; never enters the queue.
    Validation,
    NotFound,
    /// Broker or store unreachable. Fails an enqueue, requeues an apply.
    TransientInfrastructure,
    /// The message can never be applied; dropped without requeue.
    PermanentMessage,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("cart.invalid_quantity")]
    InvalidQuantity,
    #[error("cart.product_not_found")]
    ProductNotFound,
    #[error("cart.item_not_found")]
    CartItemNotFound,
    #[error("cart.insufficient_stock")]
    InsufficientStock,
    #[error("cart.publish_failed")]
    PublishFailed(#[source] BrokerError),
    #[error("cart.malformed_message")]
    MalformedMessage(#[from] super::command::CommandDecodeError),
    #[error("cart.encode_failed")]
    EncodeFailed,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl CartError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CartError::InvalidQuantity | CartError::InsufficientStock => ErrorKind::Validation,
            CartError::ProductNotFound | CartError::CartItemNotFound => ErrorKind::NotFound,
            CartError::PublishFailed(_) | CartError::Repository(_) => {
                ErrorKind::TransientInfrastructure
            }
            CartError::MalformedMessage(_) => ErrorKind::PermanentMessage,
            CartError::EncodeFailed => ErrorKind::Internal,
        }
    }

    /// Stable code exposed to callers in place of internal detail.
    pub fn code(&self) -> &'static str {
        match self {
            CartError::InvalidQuantity => "INVALID_QUANTITY",
            CartError::ProductNotFound => "PRODUCT_NOT_FOUND",
            CartError::CartItemNotFound => "CART_ITEM_NOT_FOUND",
            CartError::InsufficientStock => "INSUFFICIENT_STOCK",
            CartError::PublishFailed(_) => "PUBLISH_FAILED",
            CartError::MalformedMessage(_) => "MALFORMED_MESSAGE",
            CartError::EncodeFailed => "ENCODE_FAILED",
            CartError::Repository(_) => "REPOSITORY_ERROR",
        }
    }

    /// Maps a product lookup failure, keeping not-found distinct from transport errors.
    pub fn from_product_lookup(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound => CartError::ProductNotFound,
            other => CartError::Repository(other),
        }
    }

    /// Maps a cart item lookup failure, keeping not-found distinct from transport errors.
    pub fn from_item_lookup(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound => CartError::CartItemNotFound,
            other => CartError::Repository(other),
        }
    }
}
