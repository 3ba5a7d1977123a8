use std::sync::Arc;

use logger::TracingLogger;
use messaging::postgres_queue::PostgresMessageQueue;
use persistence::cart_item::repository::CartRepositoryPostgres;
use persistence::product::repository::ProductRepositoryPostgres;

use business::application::cart::apply_mutation::ApplyCartMutationUseCaseImpl;
use business::application::cart::worker::CartWorkerPool;
use business::domain::cache::Cache;
use business::domain::logger::Logger;

use crate::config::app_config::AppConfig;
use crate::config::worker_config::WorkerConfig;

pub struct DependencyContainer {
    pub queue: Arc<PostgresMessageQueue>,
    pub apply_use_case: Arc<ApplyCartMutationUseCaseImpl>,
    pub logger: Arc<dyn Logger>,
}

impl DependencyContainer {
    pub fn new(pool: sqlx::PgPool, cache: Arc<dyn Cache>, config: &AppConfig) -> Self {
        let logger: Arc<dyn Logger> = Arc::new(TracingLogger);

        // Infrastructure adapters
        let cart_repository = Arc::new(CartRepositoryPostgres::new(pool.clone()));
        let product_repository = Arc::new(ProductRepositoryPostgres::new(pool.clone()));
        let queue = Arc::new(PostgresMessageQueue::new(pool, config.queue.clone()));

        // Consumer use case
        let apply_use_case = Arc::new(ApplyCartMutationUseCaseImpl {
            repository: cart_repository,
            product_repository,
            cache,
            logger: logger.clone(),
            revalidate_stock: config.worker.revalidate_stock,
        });

        Self {
            queue,
            apply_use_case,
            logger,
        }
    }

    pub fn worker_pool(&self, config: &WorkerConfig) -> CartWorkerPool {
        CartWorkerPool::new(
            config.concurrency,
            self.queue.clone(),
            self.apply_use_case.clone(),
            self.logger.clone(),
            config.poll_interval,
        )
    }
}
