use std::io;
use std::net::{TcpListener, TcpStream};
use std::os::unix::io::AsRawFd;
use std::os::unix::net::UnixStream;
use std::sync::Arc;

use anyhow::Context;

use crate::config::BUFFER_SIZE;
use crate::http::connection::Connection;
use crate::http::handler::Handler;
use crate::server::table::ConnectionTable;

const LISTENER: usize = 0;
const SHUTDOWN: usize = 1;

/// One single-threaded event loop with a private connection table.
///
/// The only thing shared with sibling workers is the listening socket, and
/// that is only ever used to accept.
pub struct Worker {
    id: usize,
    listener: Arc<TcpListener>,
    // held so the polled descriptor stays open
    _shutdown: Arc<UnixStream>,
    handler: Handler,
    table: ConnectionTable<TcpStream>,
    scratch: Box<[u8]>,
}

impl Worker {
    pub fn new(
        id: usize,
        listener: Arc<TcpListener>,
        shutdown: Arc<UnixStream>,
        handler: Handler,
        capacity: usize,
    ) -> Self {
        let table = ConnectionTable::new(capacity, &[listener.as_raw_fd(), shutdown.as_raw_fd()]);

        Self {
            id,
            listener,
            _shutdown: shutdown,
            handler,
            table,
            scratch: vec![0; BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Runs until the shutdown channel becomes readable or `poll` fails.
    ///
    /// Returning drops the table, which closes every connection and file the
    /// worker still holds.
    pub fn run(mut self) -> anyhow::Result<()> {
        self.handler
            .access_log()
            .message(&format!("Worker {} started", self.id));
        tracing::info!(worker = self.id, capacity = self.table.capacity(), "Worker started");

        loop {
            if let Err(e) = self.table.wait(None) {
                if e.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                tracing::error!(worker = self.id, error = %e, "Poll failed");
                self.handler
                    .access_log()
                    .message(&format!("Poll error: {}", e));
                return Err(e).with_context(|| format!("worker {} poll failed", self.id));
            }

            if !self.table.sentinel_readiness(SHUTDOWN).is_empty() {
                tracing::info!(worker = self.id, open = self.table.len(), "Worker stopping");
                return Ok(());
            }

            if self.table.sentinel_readiness(LISTENER).readable() {
                self.accept();
            }

            self.service_connections();
        }
    }

    /// Accepts at most one pending connection.
    fn accept(&mut self) {
        let (stream, peer) = match self.listener.accept() {
            Ok(accepted) => accepted,
            // a sibling worker took it
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return,
            Err(e) => {
                tracing::warn!(worker = self.id, error = %e, "Accept failed");
                return;
            }
        };

        if self.table.is_full() {
            tracing::warn!(worker = self.id, %peer, "Connection rejected: client limit reached");
            self.handler
                .access_log()
                .message("Connection rejected: client limit reached");
            return;
        }

        if let Err(e) = stream.set_nonblocking(true) {
            tracing::warn!(worker = self.id, error = %e, "Failed to make connection non-blocking");
            return;
        }

        let fd = stream.as_raw_fd();
        match self.table.insert(Connection::new(stream, BUFFER_SIZE), fd) {
            Ok(slot) => {
                tracing::debug!(worker = self.id, %peer, fd, slot, open = self.table.len(), "New connection");
            }
            Err(_rejected) => {
                tracing::warn!(worker = self.id, %peer, "Connection rejected: client limit reached");
            }
        }
    }

    /// Advances every connection poll reported ready, evicting the ones that
    /// finished.
    fn service_connections(&mut self) {
        let mut slot = 0;
        while slot < self.table.len() {
            let ready = self.table.readiness(slot);
            if ready.is_empty() {
                slot += 1;
                continue;
            }

            let Some(conn) = self.table.get_mut(slot) else {
                break;
            };

            if ready.invalid() {
                conn.close();
            }
            if ready.readable() {
                conn.on_readable(&self.handler);
            }
            if ready.writable() {
                conn.on_writable(&mut self.scratch);
            }

            if conn.is_alive() {
                let interest = conn.interest();
                self.table.set_interest(slot, interest);
                slot += 1;
            } else {
                let fd = self.table.fd(slot);
                // the swapped-in connection is examined next at this slot
                drop(self.table.remove(slot));
                tracing::debug!(worker = self.id, fd, open = self.table.len(), "Connection closed");
            }
        }
    }
}
