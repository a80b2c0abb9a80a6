//! Error types shared by every server component.

use std::{io, net::SocketAddr};

use thiserror::Error;

/// Server error.
///
/// Besides being returned from fallible operations, these values travel on
/// the Error event channel, so every variant must stay `Send + Sync`.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be bound. Fatal.
    #[error("Failed to bind listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    /// A single accept call failed. The acceptor keeps going.
    #[error("Accept failed: {0}")]
    Accept(#[source] io::Error),
    /// Reading from a client failed. Ends that session only.
    #[error("Read from {peer} failed: {source}")]
    Read {
        peer: SocketAddr,
        #[source]
        source: io::Error,
    },
    /// Writing to a client failed. Ends that session only.
    #[error("Write to {peer} failed: {source}")]
    Write {
        peer: SocketAddr,
        #[source]
        source: io::Error,
    },
    /// The configuration handed to the server is unusable.
    #[error("Invalid server configuration: {0}")]
    Config(#[from] ConfigError),
    /// A component task panicked or was cancelled.
    #[error("Task failed: {0}")]
    Task(String),
}

impl ServerError {
    /// Whether the process cannot continue after this error.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Bind { .. } | Self::Config(_))
    }
}

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_startup_errors_are_fatal() {
        let addr: SocketAddr = "127.0.0.1:6000".parse().unwrap();
        let bind = ServerError::Bind {
            addr,
            source: io::Error::from(io::ErrorKind::AddrInUse),
        };
        assert!(bind.is_fatal());
        assert!(ServerError::from(ConfigError::Invalid("buffer_size".into())).is_fatal());
        assert!(!ServerError::Accept(io::Error::from(io::ErrorKind::Other)).is_fatal());
        assert!(
            !ServerError::Read {
                peer: addr,
                source: io::Error::from(io::ErrorKind::ConnectionReset),
            }
            .is_fatal()
        );
    }

    #[test]
    fn test_error_display_names_peer() {
        let peer: SocketAddr = "10.0.0.7:51234".parse().unwrap();
        let err = ServerError::Write {
            peer,
            source: io::Error::from(io::ErrorKind::BrokenPipe),
        };
        assert!(err.to_string().starts_with("Write to 10.0.0.7:51234 failed"));
    }
}
