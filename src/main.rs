use std::time::Duration;

use clap::Parser;
use tokio::signal::unix::{SignalKind, signal};

use staticd::assets;
use staticd::config::{Cli, Config, MAX_CONNECTIONS, WORKERS};
use staticd::logging::{self, AccessLog};
use staticd::server::WorkerPool;

/// How long workers get to finish before the process exits anyway.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing();

    let cfg = Config::load(&cli)?;

    if cli.seed_static {
        assets::seed_static_root(&cfg.static_files.root)?;
    }
    if cfg.logging.enabled {
        if let Err(e) = assets::ensure_log_dir(&cfg.logging.file) {
            tracing::warn!(error = %e, "Cannot create log directory");
        }
    }

    tracing::info!(
        port = cfg.server.port,
        workers = WORKERS,
        max_connections = MAX_CONNECTIONS,
        static_root = %cfg.static_files.root.display(),
        "Server starting"
    );
    AccessLog::from_config(&cfg.logging).message("Server starting");

    let pool = WorkerPool::start(&cfg)?;
    let shutdown = pool.shutdown_handle();
    tracing::info!("Server ready! Access at: http://localhost:{}/", pool.local_addr().port());

    let mut workers = tokio::task::spawn_blocking(move || pool.join());
    let mut terminate = signal(SignalKind::terminate())?;

    tokio::select! {
        res = &mut workers => {
            res?;
            tracing::warn!("All workers exited");
            return Ok(());
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }

        _ = terminate.recv() => {
            tracing::info!("Terminate signal received");
        }
    }

    shutdown.trigger();
    match tokio::time::timeout(SHUTDOWN_GRACE, workers).await {
        Ok(res) => res?,
        Err(_) => {
            // the runtime would otherwise wait on the blocking join forever
            tracing::warn!("Workers did not stop in time, exiting anyway");
            std::process::exit(0);
        }
    }

    Ok(())
}
