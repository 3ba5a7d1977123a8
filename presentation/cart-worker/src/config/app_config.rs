use messaging::options::QueueOptions;

use super::cache_config::CacheConfig;
use super::database_config::DatabaseSettings;
use super::queue_config::queue_options_from_env;
use super::worker_config::WorkerConfig;

pub struct AppConfig {
    pub database: DatabaseSettings,
    pub cache: CacheConfig,
    pub queue: QueueOptions,
    pub worker: WorkerConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database: DatabaseSettings::from_env()?,
            cache: CacheConfig::from_env()?,
            queue: queue_options_from_env()?,
            worker: WorkerConfig::from_env()?,
        })
    }
}
