use async_trait::async_trait;
use uuid::Uuid;

/// Routing key of the queue carrying cart mutation commands.
pub const CART_QUEUE: &str = "cart_queue";

/// Content type of every cart mutation payload.
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    #[error("broker.unavailable")]
    Unavailable,
    #[error("broker.publish_not_confirmed")]
    NotConfirmed,
    /// The delivery's lease expired and the message was handed to another consumer.
    #[error("broker.stale_delivery")]
    StaleDelivery,
}

/// A message handed to a consumer and awaiting its disposition.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    /// Broker-assigned message identity, stable across redeliveries.
    pub message_id: Uuid,
    /// Handle for acking or nacking this particular delivery.
    pub delivery_tag: Uuid,
    pub content_type: String,
    pub payload: Vec<u8>,
    /// Number of times the message has been delivered, this delivery included.
    pub attempts: u32,
}

impl Delivery {
    pub fn is_redelivery(&self) -> bool {
        self.attempts > 1
    }
}

#[async_trait]
pub trait MessagePublisher: Send + Sync {
    /// Publishes a payload to `queue`. Returns the broker-assigned message id once the
    /// broker has confirmed the message is durable.
    async fn publish(
        &self,
        queue: &str,
        content_type: &str,
        payload: &[u8],
    ) -> Result<Uuid, BrokerError>;
}

#[async_trait]
pub trait MessageConsumer: Send + Sync {
    /// Takes the next visible message off the queue, or `None` when it is empty.
    async fn receive(&self) -> Result<Option<Delivery>, BrokerError>;
    async fn ack(&self, delivery: &Delivery) -> Result<(), BrokerError>;
    /// Settles a failed delivery. `reason` is the error code kept with a dead-lettered message.
    async fn nack(
        &self,
        delivery: &Delivery,
        requeue: bool,
        reason: &str,
    ) -> Result<(), BrokerError>;
}
