use std::net::{SocketAddr, TcpListener, ToSocketAddrs};

use anyhow::Context;
use socket2::{Domain, Protocol, Socket, Type};

use crate::config::LISTEN_BACKLOG;

/// Creates the listening socket every worker accepts from.
///
/// The socket is non-blocking: workers race for each pending connection and
/// the losers see `WouldBlock`.
pub fn bind(listen_addr: &str) -> anyhow::Result<TcpListener> {
    let addr: SocketAddr = listen_addr
        .to_socket_addrs()
        .with_context(|| format!("Invalid listen address {}", listen_addr))?
        .next()
        .with_context(|| format!("No address for {}", listen_addr))?;

    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket
        .bind(&addr.into())
        .with_context(|| format!("Failed to bind {}", addr))?;
    socket.listen(LISTEN_BACKLOG)?;
    socket.set_nonblocking(true)?;

    let listener: TcpListener = socket.into();
    tracing::info!("Listening on {}", listener.local_addr()?);
    Ok(listener)
}
