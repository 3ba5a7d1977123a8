use std::env;
use std::time::Duration;

use messaging::options::QueueOptions;

use super::{non_empty, parse_or};

/// Environment variables:
/// - QUEUE_NAME: queue to consume (default: "cart_queue")
/// - QUEUE_LEASE_SECS: visibility timeout of a received message (default: 30)
/// - QUEUE_BASE_BACKOFF_MS / QUEUE_MAX_BACKOFF_MS: requeue delay bounds (default: 1000 / 60000)
/// - QUEUE_MAX_DELIVERIES: dead-letter after this many deliveries (default: unlimited)
pub fn queue_options_from_env() -> anyhow::Result<QueueOptions> {
    queue_options_from_lookup(|key| env::var(key).ok())
}

pub(crate) fn queue_options_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<QueueOptions> {
    let defaults = QueueOptions::default();
    let max_deliveries = match non_empty(&lookup, "QUEUE_MAX_DELIVERIES") {
        Some(_) => Some(parse_or(&lookup, "QUEUE_MAX_DELIVERIES", 0u32)?),
        None => None,
    };

    Ok(QueueOptions {
        queue: non_empty(&lookup, "QUEUE_NAME").unwrap_or(defaults.queue),
        lease: Duration::from_secs(parse_or(
            &lookup,
            "QUEUE_LEASE_SECS",
            defaults.lease.as_secs(),
        )?),
        base_backoff: Duration::from_millis(parse_or(
            &lookup,
            "QUEUE_BASE_BACKOFF_MS",
            defaults.base_backoff.as_millis() as u64,
        )?),
        max_backoff: Duration::from_millis(parse_or(
            &lookup,
            "QUEUE_MAX_BACKOFF_MS",
            defaults.max_backoff.as_millis() as u64,
        )?),
        max_deliveries,
    })
}
