use std::env;
use std::time::Duration;

use super::parse_or;

/// Worker pool settings
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub concurrency: usize,
    pub poll_interval: Duration,
    pub revalidate_stock: bool,
}

impl WorkerConfig {
    /// Environment variables:
    /// - CART_WORKER_CONCURRENCY: number of consumers (default: 1, preserves queue order)
    /// - CART_WORKER_POLL_INTERVAL_MS: idle wait between empty receives (default: 500)
    /// - CART_WORKER_REVALIDATE_STOCK: re-check stock before applying (default: true)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            concurrency: parse_or(&lookup, "CART_WORKER_CONCURRENCY", 1usize)?.max(1),
            poll_interval: Duration::from_millis(parse_or(
                &lookup,
                "CART_WORKER_POLL_INTERVAL_MS",
                500,
            )?),
            revalidate_stock: parse_or(&lookup, "CART_WORKER_REVALIDATE_STOCK", true)?,
        })
    }
}
