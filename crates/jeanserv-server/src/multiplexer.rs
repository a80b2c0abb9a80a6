//! Event multiplexer.
//!
//! The single consumer of every event channel. Each iteration services
//! exactly one source: a session, log or error event, or the idle timer
//! when nothing else arrived in time. The winning event is decorated,
//! timestamped and written to the output sink, which only this task touches.

use std::time::Duration;

use chrono::Local;
use jeanserv_core::{Event, EventReceivers, Palette, Tone};

use crate::sink::OutputSink;

/// Timestamp layout prefixed to every output line.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Merges the event channels and the idle timer into one output stream.
pub struct EventMultiplexer<O> {
    receivers: EventReceivers,
    sink: O,
    idle_interval: Duration,
    palette: Palette,
    session_open: bool,
    log_open: bool,
    error_open: bool,
}

impl<O: OutputSink> EventMultiplexer<O> {
    /// Create a multiplexer over `receivers` writing to `sink`.
    #[must_use]
    pub const fn new(
        receivers: EventReceivers,
        sink: O,
        idle_interval: Duration,
        palette: Palette,
    ) -> Self {
        Self {
            receivers,
            sink,
            idle_interval,
            palette,
            session_open: true,
            log_open: true,
            error_open: true,
        }
    }

    /// Wait for the next event.
    ///
    /// The idle timer starts afresh on every call. Returns `None` once every
    /// producer has gone away.
    pub async fn next_event(&mut self) -> Option<Event> {
        loop {
            if !(self.session_open || self.log_open || self.error_open) {
                return None;
            }

            tokio::select! {
                msg = self.receivers.session.recv(), if self.session_open => match msg {
                    Some(msg) => return Some(Event::Session(msg)),
                    None => self.session_open = false,
                },
                msg = self.receivers.log.recv(), if self.log_open => match msg {
                    Some(msg) => return Some(Event::Log(msg)),
                    None => self.log_open = false,
                },
                err = self.receivers.error.recv(), if self.error_open => match err {
                    Some(err) => return Some(Event::Error(err)),
                    None => self.error_open = false,
                },
                () = tokio::time::sleep(self.idle_interval) => {
                    return Some(Event::Idle(self.idle_interval));
                }
            }
        }
    }

    /// Decorate an event for output, without the timestamp.
    #[must_use]
    pub fn render(&self, event: &Event) -> String {
        match event {
            Event::Session(msg) => self.palette.paint(Tone::Session, msg),
            Event::Log(msg) => self.palette.paint(Tone::Log, msg),
            Event::Error(err) => self.palette.paint(Tone::Error, &err.to_string()),
            Event::Idle(idle) => self.palette.paint(
                Tone::Idle,
                &format!("No activity for {} seconds", idle.as_secs()),
            ),
        }
    }

    /// Consume events until every producer is gone.
    ///
    /// The acceptor keeps a producer for the life of the process, so in a
    /// running server this never returns.
    pub async fn run(mut self) {
        while let Some(event) = self.next_event().await {
            let line = format!(
                "{} {}",
                Local::now().format(TIMESTAMP_FORMAT),
                self.render(&event)
            );
            if let Err(e) = self.sink.write_line(&line).await {
                tracing::warn!(error = %e, "Failed to write event line");
            }
        }
        tracing::debug!("All event producers closed, multiplexer exiting");
    }
}
