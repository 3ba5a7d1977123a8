use tokio::sync::watch;

use crate::config::worker_config::WorkerConfig;
use crate::setup::dependency_injection::DependencyContainer;

pub struct WorkerRuntime;

impl WorkerRuntime {
    /// Runs the worker pool until SIGINT/SIGTERM, then lets in-flight messages settle.
    pub async fn run(config: &WorkerConfig, container: DependencyContainer) -> anyhow::Result<()> {
        match container.queue.pending_count().await {
            Ok(pending) => tracing::info!(
                queue = container.queue.queue(),
                pending,
                workers = config.concurrency,
                revalidate_stock = config.revalidate_stock,
                "starting cart workers"
            ),
            Err(e) => tracing::warn!(error = %e, "could not read queue depth"),
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let pool = container.worker_pool(config);
        let workers = tokio::spawn(pool.run(shutdown_rx));

        shutdown_signal().await;
        let _ = shutdown_tx.send(true);

        let stats = workers.await?;
        tracing::info!(
            acked = stats.acked,
            rejected = stats.rejected,
            requeued = stats.requeued,
            "cart workers stopped"
        );
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
