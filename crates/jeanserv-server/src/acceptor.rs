//! Connection acceptor.
//!
//! Owns the listening socket and hands every accepted connection to a
//! freshly spawned [`SessionWorker`]. Workers are detached: the acceptor
//! neither waits for nor tracks them, so there is no limit on concurrent
//! sessions and a failing session cannot affect the acceptor.

use std::{io, net::SocketAddr, sync::Arc};

use jeanserv_core::{CommandTable, EventSender, ServerConfig, ServerError};
use tokio::net::{TcpListener, TcpStream};

use crate::session::SessionWorker;

/// Accepts connections and spawns a session worker for each.
pub struct Acceptor {
    listener: TcpListener,
    local_addr: SocketAddr,
    config: Arc<ServerConfig>,
    commands: Arc<CommandTable>,
    events: EventSender,
}

impl Acceptor {
    /// Bind the listening socket.
    ///
    /// # Errors
    /// Returns `ServerError::Bind` if the socket cannot be bound. The server
    /// cannot run without it.
    pub async fn bind(
        config: Arc<ServerConfig>,
        commands: Arc<CommandTable>,
        events: EventSender,
    ) -> Result<Self, ServerError> {
        let addr = config.listen_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServerError::Bind { addr, source })?;

        Ok(Self {
            listener,
            local_addr,
            config,
            commands,
            events,
        })
    }

    /// Address the listener is bound to.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept connections for as long as the task lives.
    ///
    /// Accept errors are reported as error events and the loop continues.
    pub async fn run(self) {
        self.events
            .log(format!("binding listener on socket {}", self.local_addr))
            .await;

        loop {
            self.events.log("waiting for next connection").await;
            let accepted = self.listener.accept().await;
            self.on_accept(accepted).await;
        }
    }

    /// Handle one accept result: spawn a session or report the failure.
    async fn on_accept(&self, accepted: io::Result<(TcpStream, SocketAddr)>) {
        match accepted {
            Ok((stream, peer)) => self.spawn_session(stream, peer),
            Err(e) => {
                tracing::warn!(error = %e, "Accept failed");
                self.events.error(ServerError::Accept(e)).await;
            }
        }
    }

    fn spawn_session(&self, stream: TcpStream, peer: SocketAddr) {
        let worker = SessionWorker::new(
            stream,
            peer,
            Arc::clone(&self.config),
            Arc::clone(&self.commands),
            self.events.clone(),
        );
        tracing::debug!(%peer, session = %worker.id(), "Spawning session worker");
        // Detached on purpose; the runtime cancels it on shutdown.
        drop(tokio::spawn(worker.run()));
    }
}

impl Drop for Acceptor {
    fn drop(&mut self) {
        self.events.try_log("closing connection acceptor");
    }
}
