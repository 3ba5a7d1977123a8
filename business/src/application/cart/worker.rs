use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::domain::broker::{Delivery, MessageConsumer};
use crate::domain::cart::errors::{CartError, ErrorKind};
use crate::domain::cart::use_cases::apply_mutation::{
    ApplyCartMutationParams, ApplyCartMutationUseCase, ApplyOutcome,
};
use crate::domain::logger::Logger;

/// What the worker tells the broker about a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Ack,
    /// Nack without requeue: the message can never succeed.
    Reject,
    /// Nack with requeue: the failure is presumed transient.
    Requeue,
}

impl Disposition {
    pub fn for_result(result: &Result<ApplyOutcome, CartError>) -> Self {
        match result {
            Ok(_) => Disposition::Ack,
            Err(e) => match e.kind() {
                ErrorKind::TransientInfrastructure => Disposition::Requeue,
                ErrorKind::PermanentMessage
                | ErrorKind::Validation
                | ErrorKind::NotFound
                | ErrorKind::Internal => Disposition::Reject,
            },
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    pub acked: u64,
    pub rejected: u64,
    pub requeued: u64,
}

impl WorkerStats {
    fn record(&mut self, disposition: Disposition) {
        match disposition {
            Disposition::Ack => self.acked += 1,
            Disposition::Reject => self.rejected += 1,
            Disposition::Requeue => self.requeued += 1,
        }
    }

    fn merge(&mut self, other: WorkerStats) {
        self.acked += other.acked;
        self.rejected += other.rejected;
        self.requeued += other.requeued;
    }
}

/// A single consumer draining the cart queue.
///
/// Messages are processed one at a time in receipt order. Shutdown is only observed
/// between messages, so a delivery that has been received always reaches its
/// disposition before the loop exits.
pub struct CartWorker {
    pub name: String,
    pub consumer: Arc<dyn MessageConsumer>,
    pub apply_use_case: Arc<dyn ApplyCartMutationUseCase>,
    pub logger: Arc<dyn Logger>,
    pub poll_interval: Duration,
}

impl CartWorker {
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> WorkerStats {
        self.logger
            .info(&format!("Worker {} started, waiting for cart messages", self.name));
        let mut stats = WorkerStats::default();

        loop {
            if *shutdown.borrow() {
                break;
            }

            match self.consumer.receive().await {
                Ok(Some(delivery)) => stats.record(self.process(delivery).await),
                Ok(None) => {
                    if wait_or_shutdown(&mut shutdown, self.poll_interval).await {
                        break;
                    }
                }
                Err(e) => {
                    self.logger.error(&format!(
                        "Worker {} failed to receive error_code=CONSUME_FAILED error={}",
                        self.name, e
                    ));
                    if wait_or_shutdown(&mut shutdown, self.poll_interval).await {
                        break;
                    }
                }
            }
        }

        self.logger.info(&format!(
            "Worker {} stopped acked={} rejected={} requeued={}",
            self.name, stats.acked, stats.rejected, stats.requeued
        ));
        stats
    }

    /// Applies one delivery and settles it with the broker.
    pub async fn process(&self, delivery: Delivery) -> Disposition {
        if delivery.is_redelivery() {
            self.logger.debug(&format!(
                "Redelivered cart message message_id={} attempts={}",
                delivery.message_id, delivery.attempts
            ));
        }

        let result = self
            .apply_use_case
            .execute(ApplyCartMutationParams {
                message_id: delivery.message_id,
                content_type: delivery.content_type.clone(),
                payload: delivery.payload.clone(),
            })
            .await;
        let disposition = Disposition::for_result(&result);

        if let Err(e) = &result {
            self.logger.warn(&format!(
                "Cart message not applied message_id={} disposition={:?} error_code={}",
                delivery.message_id,
                disposition,
                e.code()
            ));
        }

        let reason = result.as_ref().err().map_or("", CartError::code);
        let settled = match disposition {
            Disposition::Ack => self.consumer.ack(&delivery).await,
            Disposition::Reject => self.consumer.nack(&delivery, false, reason).await,
            Disposition::Requeue => self.consumer.nack(&delivery, true, reason).await,
        };
        // An unsettled delivery is redelivered once its lease runs out.
        if let Err(e) = settled {
            self.logger.error(&format!(
                "Failed to settle cart message message_id={} disposition={:?} error={}",
                delivery.message_id, disposition, e
            ));
        }

        disposition
    }
}

/// Sleeps for `delay`, returning `true` early if shutdown was requested.
async fn wait_or_shutdown(shutdown: &mut watch::Receiver<bool>, delay: Duration) -> bool {
    let changed = tokio::select! {
        changed = shutdown.changed() => Some(changed.is_ok()),
        _ = tokio::time::sleep(delay) => None,
    };
    match changed {
        Some(true) => *shutdown.borrow(),
        // The sender is gone; nobody can ask us to keep running.
        Some(false) => true,
        None => false,
    }
}

/// Several workers consuming the same queue concurrently.
pub struct CartWorkerPool {
    workers: Vec<CartWorker>,
    logger: Arc<dyn Logger>,
}

impl CartWorkerPool {
    pub fn new(
        concurrency: usize,
        consumer: Arc<dyn MessageConsumer>,
        apply_use_case: Arc<dyn ApplyCartMutationUseCase>,
        logger: Arc<dyn Logger>,
        poll_interval: Duration,
    ) -> Self {
        let workers = (0..concurrency.max(1))
            .map(|index| CartWorker {
                name: format!("cart-worker-{}", index),
                consumer: consumer.clone(),
                apply_use_case: apply_use_case.clone(),
                logger: logger.clone(),
                poll_interval,
            })
            .collect();
        Self { workers, logger }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Runs every worker until shutdown is signalled and all of them have drained.
    pub async fn run(self, shutdown: watch::Receiver<bool>) -> WorkerStats {
        let mut tasks = JoinSet::new();
        for worker in self.workers {
            let shutdown = shutdown.clone();
            tasks.spawn(async move { worker.run(shutdown).await });
        }

        let mut total = WorkerStats::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(stats) => total.merge(stats),
                Err(e) => self
                    .logger
                    .error(&format!("Cart worker task ended abnormally error={}", e)),
            }
        }
        total
    }
}
