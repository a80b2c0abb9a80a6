//! Per-connection session worker.
//!
//! One worker owns one connection and its receive buffer. Every read is
//! treated as one message whose final byte (the line terminator) is
//! dropped. Messages are not reassembled across reads: input larger than
//! the buffer arrives as several independent messages.

use std::{borrow::Cow, net::SocketAddr, sync::Arc};

use jeanserv_core::{CommandTable, EventSender, Palette, ServerConfig, ServerError};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::Instrument;
use uuid::Uuid;

/// How a session ended without an I/O failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The client closed its side of the connection.
    Eof,
    /// A command asked for the session to end.
    Closed,
}

/// Drives a single client connection from banner to close.
pub struct SessionWorker<S> {
    id: Uuid,
    stream: S,
    peer: SocketAddr,
    config: Arc<ServerConfig>,
    commands: Arc<CommandTable>,
    events: EventSender,
    palette: Palette,
}

impl<S> SessionWorker<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Create a worker for an accepted connection.
    #[must_use]
    pub fn new(
        stream: S,
        peer: SocketAddr,
        config: Arc<ServerConfig>,
        commands: Arc<CommandTable>,
        events: EventSender,
    ) -> Self {
        let palette = config.palette();
        Self {
            id: Uuid::new_v4(),
            stream,
            peer,
            config,
            commands,
            events,
            palette,
        }
    }

    /// Identifier used in diagnostics.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Serve the connection until the client leaves or I/O fails.
    ///
    /// The connection is shut down and the closing log event emitted on every
    /// exit path. The stream itself is dropped with the worker.
    pub async fn run(mut self) {
        let span = tracing::info_span!("session", id = %self.id, peer = %self.peer);
        async move {
            let outcome = self.serve().await;
            if let Err(err) = self.stream.shutdown().await {
                tracing::trace!(error = %err, "Shutdown after session end failed");
            }
            match outcome {
                Ok(end) => tracing::debug!(?end, "Session ended"),
                Err(err) => {
                    tracing::debug!(error = %err, "Session failed");
                    self.events.error(err).await;
                }
            }
            self.events
                .log(format!(
                    "closing {}:{} session",
                    self.peer.ip(),
                    self.peer.port()
                ))
                .await;
        }
        .instrument(span)
        .await;
    }

    async fn serve(&mut self) -> Result<SessionEnd, ServerError> {
        let banner = format!("{}\n", self.config.banner);
        self.write(banner.as_bytes()).await?;

        let (ip, port) = (self.peer.ip(), self.peer.port());
        self.events
            .session(format!("starting new session:{ip}:{port}"))
            .await;

        let mut buf = vec![0u8; self.config.buffer_size];
        loop {
            let n = match self.stream.read(&mut buf).await {
                Ok(0) => {
                    self.events
                        .session(format!("Received EOF from {port} ."))
                        .await;
                    return Ok(SessionEnd::Eof);
                }
                Ok(n) => n,
                Err(source) => {
                    return Err(ServerError::Read {
                        peer: self.peer,
                        source,
                    });
                }
            };

            let message = strip_terminator(&buf[..n]);
            self.events
                .session(format!("({port})Received message: {message}"))
                .await;

            let Some(reply) = self.commands.dispatch(&message, self.peer, self.palette) else {
                continue;
            };
            tracing::debug!(command = %message, "Dispatched command");

            if let Some(summary) = reply.summary() {
                self.events
                    .session(format!("({port})sending: {summary}"))
                    .await;
            }
            self.write(reply.payload()).await?;
            if reply.closes_session() {
                return Ok(SessionEnd::Closed);
            }
        }
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<(), ServerError> {
        self.stream
            .write_all(bytes)
            .await
            .map_err(|source| ServerError::Write {
                peer: self.peer,
                source,
            })
    }
}

/// Decode one read as a message, dropping its final byte.
///
/// The final byte is removed whether or not it is a terminator.
#[must_use]
pub fn strip_terminator(read: &[u8]) -> Cow<'_, str> {
    let end = read.len().saturating_sub(1);
    String::from_utf8_lossy(&read[..end])
}
