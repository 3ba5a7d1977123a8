use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{Config, Pool, PoolConfig, Runtime};
use redis::AsyncCommands;
use thiserror::Error;

use business::domain::cache::{Cache, CacheError};

#[derive(Error, Debug)]
pub enum RedisSetupError {
    #[error("cache.pool_error")]
    PoolError,
    #[error("cache.connection_error")]
    ConnectionError,
}

/// Builds a connection pool and checks that Redis answers.
pub async fn create_redis_pool(
    url: &str,
    pool_size: usize,
    timeout: Duration,
) -> Result<Pool, RedisSetupError> {
    let mut pool_config = PoolConfig::new(pool_size.max(1));
    pool_config.timeouts.wait = Some(timeout);
    pool_config.timeouts.create = Some(timeout);
    pool_config.timeouts.recycle = Some(timeout);
    let mut config = Config::from_url(url);
    config.pool = Some(pool_config);

    let pool = config.create_pool(Some(Runtime::Tokio1)).map_err(|e| {
        tracing::error!(error = %e, "failed to create redis pool");
        RedisSetupError::PoolError
    })?;

    pool.get().await.map_err(|e| {
        tracing::error!(error = %e, "failed to connect to redis");
        RedisSetupError::ConnectionError
    })?;

    Ok(pool)
}

/// Cache shared by every worker instance.
#[derive(Clone)]
pub struct RedisCache {
    pool: Pool,
}

impl RedisCache {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn connection(&self) -> Result<deadpool_redis::Connection, CacheError> {
        self.pool.get().await.map_err(|e| {
            tracing::warn!(error = %e, "failed to get redis connection");
            CacheError::Unavailable
        })
    }
}

/// Redis rejects `SET EX 0`; anything shorter than a second is rounded up.
fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.connection().await?;
        conn.get::<_, Option<Vec<u8>>>(key).await.map_err(|e| {
            tracing::warn!(key = %key, error = %e, "redis GET error");
            CacheError::Unavailable
        })
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds(ttl))
            .await
            .map_err(|e| {
                tracing::warn!(key = %key, error = %e, "redis SET error");
                CacheError::Unavailable
            })
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(key).await.map_err(|e| {
            tracing::warn!(key = %key, error = %e, "redis DEL error");
            CacheError::Unavailable
        })
    }
}
