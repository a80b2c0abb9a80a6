//! Orchestrator wiring the acceptor and the multiplexer together.

use std::{net::SocketAddr, sync::Arc};

use jeanserv_core::{CommandTable, ServerConfig, ServerError, event};
use tokio::task::JoinHandle;

use crate::{acceptor::Acceptor, multiplexer::EventMultiplexer, sink::OutputSink};

/// A configured server, ready to start.
#[derive(Debug)]
pub struct Server {
    config: Arc<ServerConfig>,
    commands: Arc<CommandTable>,
}

impl Server {
    /// Create a new server.
    #[must_use]
    pub fn new(config: ServerConfig, commands: CommandTable) -> Self {
        Self {
            config: Arc::new(config),
            commands: Arc::new(commands),
        }
    }

    /// Bind the listener, then spawn the multiplexer and acceptor tasks.
    ///
    /// # Errors
    /// Returns `ServerError::Config` if the configuration fails validation and
    /// `ServerError::Bind` if the listener cannot be bound. No task is spawned
    /// in either case.
    pub async fn start<O>(self, sink: O) -> Result<ServerHandle, ServerError>
    where
        O: OutputSink + 'static,
    {
        self.config.validate()?;
        let (events, receivers) = event::channel(self.config.event_capacity);
        let acceptor = Acceptor::bind(
            Arc::clone(&self.config),
            Arc::clone(&self.commands),
            events,
        )
        .await?;
        let local_addr = acceptor.local_addr();

        let multiplexer = EventMultiplexer::new(
            receivers,
            sink,
            self.config.idle_interval(),
            self.config.palette(),
        );
        let multiplexer = tokio::spawn(multiplexer.run());
        let acceptor = tokio::spawn(acceptor.run());

        tracing::info!(addr = %local_addr, "Server started");
        Ok(ServerHandle {
            local_addr,
            acceptor,
            multiplexer,
        })
    }

    /// Start the server and wait for both tasks to finish.
    ///
    /// # Errors
    /// Returns error if binding fails or a task panics.
    pub async fn run<O>(self, sink: O) -> Result<(), ServerError>
    where
        O: OutputSink + 'static,
    {
        self.start(sink).await?.wait().await
    }
}

/// Handle to a running server.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    acceptor: JoinHandle<()>,
    multiplexer: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the listener is bound to.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Wait for the acceptor and the multiplexer to finish.
    ///
    /// # Errors
    /// Returns `ServerError::Task` if either task panicked or was aborted.
    pub async fn wait(self) -> Result<(), ServerError> {
        let (acceptor, multiplexer) = tokio::join!(self.acceptor, self.multiplexer);
        acceptor.map_err(|e| ServerError::Task(format!("acceptor: {e}")))?;
        multiplexer.map_err(|e| ServerError::Task(format!("multiplexer: {e}")))?;
        Ok(())
    }

    /// Stop accepting connections and stop the multiplexer.
    ///
    /// Sessions already running are left to finish on their own.
    pub fn abort(&self) {
        self.acceptor.abort();
        self.multiplexer.abort();
    }
}

#[cfg(test)]
mod tests {
    use jeanserv_core::ConfigError;

    use super::*;
    use crate::sink::ChannelSink;

    fn ephemeral() -> ServerConfig {
        ServerConfig {
            port: 0,
            color: false,
            ..ServerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_start_reports_bind_in_output() {
        let (sink, mut lines) = ChannelSink::new();
        let handle = Server::new(ephemeral(), CommandTable::new())
            .start(sink)
            .await
            .unwrap();

        let first = lines.recv().await.unwrap();
        let second = lines.recv().await.unwrap();
        let expected = format!("binding listener on socket {}", handle.local_addr());
        assert!(
            [&first, &second].iter().any(|l| l.ends_with(&expected)),
            "{first} / {second}"
        );
        handle.abort();
    }

    #[tokio::test]
    async fn test_wait_reports_aborted_tasks() {
        let (sink, _lines) = ChannelSink::new();
        let handle = Server::new(ephemeral(), CommandTable::new())
            .start(sink)
            .await
            .unwrap();
        handle.abort();
        assert!(matches!(handle.wait().await, Err(ServerError::Task(_))));
    }

    #[tokio::test]
    async fn test_start_rejects_unusable_config() {
        let broken = [
            ServerConfig {
                event_capacity: 0,
                ..ephemeral()
            },
            ServerConfig {
                idle_interval_secs: 0,
                ..ephemeral()
            },
            ServerConfig {
                buffer_size: 0,
                ..ephemeral()
            },
        ];
        for config in broken {
            let (sink, mut lines) = ChannelSink::new();
            let err = Server::new(config, CommandTable::new())
                .start(sink)
                .await
                .unwrap_err();
            assert!(
                matches!(err, ServerError::Config(ConfigError::Invalid(_))),
                "{err}"
            );
            assert!(err.is_fatal());
            // Nothing was spawned, so the sink was dropped unused.
            assert!(lines.recv().await.is_none());
        }
    }

    #[tokio::test]
    async fn test_run_fails_fast_on_bind_conflict() {
        let (sink, _lines) = ChannelSink::new();
        let first = Server::new(ephemeral(), CommandTable::new())
            .start(sink)
            .await
            .unwrap();

        let taken = ServerConfig {
            port: first.local_addr().port(),
            ..ephemeral()
        };
        let (sink, _lines) = ChannelSink::new();
        let err = Server::new(taken, CommandTable::new())
            .run(sink)
            .await
            .unwrap_err();
        assert!(err.is_fatal());
        first.abort();
    }
}
