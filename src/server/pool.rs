use std::io::Write;
use std::net::{SocketAddr, TcpListener};
use std::os::unix::net::UnixStream;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::Context;

use crate::config::{Config, WORKERS, connections_per_worker};
use crate::http::handler::Handler;
use crate::logging::AccessLog;
use crate::server::listener;
use crate::server::worker::Worker;
use crate::static_files::StaticFiles;

/// Wakes every worker so it returns from its loop.
///
/// The receiving end sits in each worker's poll set; one byte written here
/// leaves it readable for all of them. Dropping the last handle has the same
/// effect.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    notifier: Arc<UnixStream>,
}

impl ShutdownHandle {
    pub fn trigger(&self) {
        if let Err(e) = (&*self.notifier).write(&[1]) {
            tracing::warn!(error = %e, "Failed to signal workers");
        }
    }
}

/// N workers sharing one listening socket. A worker that dies is not
/// replaced; its siblings keep serving.
pub struct WorkerPool {
    workers: Vec<JoinHandle<anyhow::Result<()>>>,
    shutdown: ShutdownHandle,
    local_addr: SocketAddr,
}

impl WorkerPool {
    /// Binds the configured address and starts [`WORKERS`] workers.
    pub fn start(cfg: &Config) -> anyhow::Result<Self> {
        let listener = listener::bind(&cfg.listen_addr())?;
        let handler = Handler::new(
            StaticFiles::from_config(&cfg.static_files),
            AccessLog::from_config(&cfg.logging),
        );

        Self::spawn(listener, WORKERS, connections_per_worker(), handler)
    }

    /// Starts `workers` workers on an already bound listener, each with room
    /// for `capacity` connections.
    pub fn spawn(
        listener: TcpListener,
        workers: usize,
        capacity: usize,
        handler: Handler,
    ) -> anyhow::Result<Self> {
        let local_addr = listener.local_addr()?;
        let listener = Arc::new(listener);
        let (notifier, receiver) = UnixStream::pair().context("Failed to create shutdown channel")?;
        let receiver = Arc::new(receiver);

        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let worker = Worker::new(
                id,
                listener.clone(),
                receiver.clone(),
                handler.clone(),
                capacity,
            );

            let handle = thread::Builder::new()
                .name(format!("worker-{}", id))
                .spawn(move || worker.run())
                .with_context(|| format!("Failed to spawn worker {}", id))?;
            handles.push(handle);
        }

        Ok(Self {
            workers: handles,
            shutdown: ShutdownHandle {
                notifier: Arc::new(notifier),
            },
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    pub fn shutdown(&self) {
        self.shutdown.trigger();
    }

    /// Waits for every worker to stop. Worker failures are logged, not
    /// returned.
    pub fn join(self) {
        for (id, handle) in self.workers.into_iter().enumerate() {
            match handle.join() {
                Ok(Ok(())) => tracing::debug!(worker = id, "Worker exited"),
                Ok(Err(e)) => tracing::error!(worker = id, error = ?e, "Worker terminated"),
                Err(_) => tracing::error!(worker = id, "Worker panicked"),
            }
        }
    }
}
