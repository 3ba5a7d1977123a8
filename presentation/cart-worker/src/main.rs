use dotenvy::dotenv;

mod config;
mod setup;

use config::app_config::AppConfig;
use config::{cache_config, database_config};
use setup::{dependency_injection::DependencyContainer, runtime::WorkerRuntime};

/// Cart worker entry point
///
/// Loads configuration, connects the store, queue and cache, then drains the cart
/// queue until the process is asked to stop.
/// - config/: Environment-driven configuration per adapter
/// - setup/: Dependency wiring and the worker lifecycle
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Initialize tracing with RUST_LOG env filter
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // 3. Load configuration
    let config = AppConfig::from_env()?;

    // 4. Initialize database and cache
    let pool = database_config::init_database(&config.database).await?;
    let cache = cache_config::init_cache(&config.cache).await?;

    // 5. Wire dependencies
    let container = DependencyContainer::new(pool.clone(), cache, &config);

    // 6. Run workers until shutdown
    WorkerRuntime::run(&config.worker, container).await?;

    pool.close().await;
    Ok(())
}
