use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use business::domain::broker::{BrokerError, Delivery, MessageConsumer, MessagePublisher};

use crate::options::QueueOptions;
use crate::status::{MessageStatus, last_error_after_nack, status_after_nack};

#[derive(Debug, FromRow)]
struct ClaimedMessage {
    id: Uuid,
    content_type: String,
    payload: Vec<u8>,
    attempts: i32,
}

/// Durable work queue on a Postgres table.
///
/// A receive leases one visible message to the caller; the lease token is the
/// delivery tag. Messages whose lease expires without an ack become visible again,
/// which gives at-least-once delivery across worker crashes. Concurrent consumers
/// never claim the same row thanks to `SKIP LOCKED`.
pub struct PostgresMessageQueue {
    pool: PgPool,
    options: QueueOptions,
}

impl PostgresMessageQueue {
    pub fn new(pool: PgPool, options: QueueOptions) -> Self {
        Self { pool, options }
    }

    pub fn queue(&self) -> &str {
        &self.options.queue
    }

    /// Number of messages waiting to be delivered, including those backing off.
    pub async fn pending_count(&self) -> Result<i64, BrokerError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM queue_messages WHERE queue = $1 AND status = $2",
        )
        .bind(&self.options.queue)
        .bind(MessageStatus::Ready.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(unavailable)
    }
}

fn unavailable(error: sqlx::Error) -> BrokerError {
    tracing::error!(error = %error, "message queue unavailable");
    BrokerError::Unavailable
}

#[async_trait]
impl MessagePublisher for PostgresMessageQueue {
    async fn publish(
        &self,
        queue: &str,
        content_type: &str,
        payload: &[u8],
    ) -> Result<Uuid, BrokerError> {
        let id = Uuid::new_v4();
        let result = sqlx::query(
            r#"INSERT INTO queue_messages (id, queue, content_type, payload, status)
            VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(id)
        .bind(queue)
        .bind(content_type)
        .bind(payload)
        .bind(MessageStatus::Ready.as_ref())
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        // The committed insert is the publish confirmation.
        if result.rows_affected() != 1 {
            return Err(BrokerError::NotConfirmed);
        }
        tracing::debug!(message_id = %id, queue, "message published");
        Ok(id)
    }
}

#[async_trait]
impl MessageConsumer for PostgresMessageQueue {
    async fn receive(&self) -> Result<Option<Delivery>, BrokerError> {
        let lease_token = Uuid::new_v4();
        let claimed = sqlx::query_as::<_, ClaimedMessage>(
            r#"UPDATE queue_messages
            SET status = $2,
                attempts = attempts + 1,
                lease_token = $3,
                leased_until = NOW() + make_interval(secs => $4),
                updated_at = NOW()
            WHERE id = (
                SELECT id FROM queue_messages
                WHERE queue = $1
                  AND ((status = $5 AND available_at <= NOW())
                    OR (status = $2 AND leased_until < NOW()))
                ORDER BY available_at, created_at
                LIMIT 1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING id, content_type, payload, attempts"#,
        )
        .bind(&self.options.queue)
        .bind(MessageStatus::InFlight.as_ref())
        .bind(lease_token)
        .bind(self.options.lease.as_secs_f64())
        .bind(MessageStatus::Ready.as_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(claimed.map(|message| Delivery {
            message_id: message.id,
            delivery_tag: lease_token,
            content_type: message.content_type,
            payload: message.payload,
            attempts: u32::try_from(message.attempts).unwrap_or_default(),
        }))
    }

    async fn ack(&self, delivery: &Delivery) -> Result<(), BrokerError> {
        let result = sqlx::query("DELETE FROM queue_messages WHERE id = $1 AND lease_token = $2")
            .bind(delivery.message_id)
            .bind(delivery.delivery_tag)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;

        // The lease expired and someone else holds the message now.
        if result.rows_affected() == 0 {
            return Err(BrokerError::StaleDelivery);
        }
        Ok(())
    }

    async fn nack(
        &self,
        delivery: &Delivery,
        requeue: bool,
        reason: &str,
    ) -> Result<(), BrokerError> {
        let status = status_after_nack(requeue, delivery.attempts, self.options.max_deliveries);
        let delay = match status {
            MessageStatus::Ready => self.options.backoff(delivery.attempts),
            _ => Default::default(),
        };
        let last_error = last_error_after_nack(status, requeue, reason);

        let result = sqlx::query(
            r#"UPDATE queue_messages
            SET status = $3,
                available_at = NOW() + make_interval(secs => $4),
                lease_token = NULL,
                leased_until = NULL,
                last_error = $5,
                updated_at = NOW()
            WHERE id = $1 AND lease_token = $2"#,
        )
        .bind(delivery.message_id)
        .bind(delivery.delivery_tag)
        .bind(status.as_ref())
        .bind(delay.as_secs_f64())
        .bind(&last_error)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        if result.rows_affected() == 0 {
            return Err(BrokerError::StaleDelivery);
        }
        if status == MessageStatus::Dead {
            tracing::warn!(
                message_id = %delivery.message_id,
                attempts = delivery.attempts,
                reason = %last_error,
                "message dead-lettered"
            );
        }
        Ok(())
    }
}
