use std::time::Duration;

use business::domain::broker::CART_QUEUE;

#[derive(Debug, Clone)]
pub struct QueueOptions {
    pub queue: String,
    /// How long a received message stays invisible before it is redelivered.
    pub lease: Duration,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
    /// Requeued deliveries beyond this count are dead-lettered. `None` retries forever.
    pub max_deliveries: Option<u32>,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            queue: CART_QUEUE.to_string(),
            lease: Duration::from_secs(30),
            base_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
            max_deliveries: None,
        }
    }
}

impl QueueOptions {
    /// Delay before the `attempts`-th failed delivery becomes visible again.
    pub fn backoff(&self, attempts: u32) -> Duration {
        let factor = 1u32
            .checked_shl(attempts.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.base_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}
