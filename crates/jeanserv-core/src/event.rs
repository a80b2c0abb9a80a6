//! Event model and the channels that carry events to the multiplexer.
//!
//! Each producer kind has its own bounded channel. Producers hold a cloned
//! [`EventSender`]. The multiplexer alone owns the [`EventReceivers`].

use std::time::Duration;

use tokio::sync::mpsc;

use crate::ServerError;

/// A unit of observability data.
#[derive(Debug)]
pub enum Event {
    /// Something happened in a client session.
    Session(String),
    /// Operational status of the server.
    Log(String),
    /// A component reported an error.
    Error(ServerError),
    /// No other event arrived within the idle interval.
    Idle(Duration),
}

/// Producer side of the event channels.
///
/// Sends are best effort: once the multiplexer is gone, events are dropped.
#[derive(Debug, Clone)]
pub struct EventSender {
    session: mpsc::Sender<String>,
    log: mpsc::Sender<String>,
    error: mpsc::Sender<ServerError>,
}

impl EventSender {
    /// Emit a session event, waiting while the channel is full.
    pub async fn session(&self, msg: impl Into<String>) {
        let _ = self.session.send(msg.into()).await;
    }

    /// Emit a log event, waiting while the channel is full.
    pub async fn log(&self, msg: impl Into<String>) {
        let _ = self.log.send(msg.into()).await;
    }

    /// Emit an error event, waiting while the channel is full.
    pub async fn error(&self, err: ServerError) {
        let _ = self.error.send(err).await;
    }

    /// Emit a log event without waiting, for use in `Drop`.
    ///
    /// Returns `false` if the event was dropped.
    pub fn try_log(&self, msg: impl Into<String>) -> bool {
        self.log.try_send(msg.into()).is_ok()
    }
}

/// Consumer side of the event channels.
#[derive(Debug)]
pub struct EventReceivers {
    pub session: mpsc::Receiver<String>,
    pub log: mpsc::Receiver<String>,
    pub error: mpsc::Receiver<ServerError>,
}

/// Create the three event channels, each holding at most `capacity` events.
///
/// # Panics
/// Panics if `capacity` is zero (see `ServerConfig::validate`).
#[must_use]
pub fn channel(capacity: usize) -> (EventSender, EventReceivers) {
    let (session_tx, session_rx) = mpsc::channel(capacity);
    let (log_tx, log_rx) = mpsc::channel(capacity);
    let (error_tx, error_rx) = mpsc::channel(capacity);

    let sender = EventSender {
        session: session_tx,
        log: log_tx,
        error: error_tx,
    };
    let receivers = EventReceivers {
        session: session_rx,
        log: log_rx,
        error: error_rx,
    };
    (sender, receivers)
}
