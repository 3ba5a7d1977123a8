use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use business::domain::cache::Cache;
use cache::local_cache::LocalCache;
use cache::redis_cache::{RedisCache, create_redis_pool};

use super::{non_empty, parse_or};

/// Cache connection settings
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub url: Option<String>,
    pub pool_size: usize,
    pub timeout: Duration,
    pub fallback_local: bool,
}

impl CacheConfig {
    /// Environment variables:
    /// - CACHE_URL: Redis URL; an in-process cache is used when unset
    /// - CACHE_POOL_SIZE: Redis connection pool size (default: 16)
    /// - CACHE_TIMEOUT_MS: connect/checkout timeout (default: 1000)
    /// - CACHE_FALLBACK_LOCAL: run with an in-process cache if Redis is down at startup
    ///   (default: false). Only safe for a single instance.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            url: non_empty(&lookup, "CACHE_URL"),
            pool_size: parse_or(&lookup, "CACHE_POOL_SIZE", 16)?,
            timeout: Duration::from_millis(parse_or(&lookup, "CACHE_TIMEOUT_MS", 1000)?),
            fallback_local: parse_or(&lookup, "CACHE_FALLBACK_LOCAL", false)?,
        })
    }
}

/// Connects the configured cache. An unreachable Redis is fatal unless the local
/// fallback was requested, since other instances would keep serving entries this
/// process can no longer invalidate.
pub async fn init_cache(config: &CacheConfig) -> anyhow::Result<Arc<dyn Cache>> {
    let Some(url) = &config.url else {
        tracing::info!("CACHE_URL not set, using in-process cache");
        return Ok(Arc::new(LocalCache::new()));
    };

    match create_redis_pool(url, config.pool_size, config.timeout).await {
        Ok(pool) => {
            tracing::info!(pool_size = config.pool_size, "connected to redis cache");
            Ok(Arc::new(RedisCache::new(pool)))
        }
        Err(e) if config.fallback_local => {
            tracing::error!(
                error = %e,
                "redis unavailable, falling back to in-process cache; invalidations will not reach other instances"
            );
            Ok(Arc::new(LocalCache::new()))
        }
        Err(e) => Err(e).context(
            "redis cache unavailable (set CACHE_FALLBACK_LOCAL=true to run without it)",
        ),
    }
}
