//! Output sinks for the multiplexed event stream.

use std::io;

use async_trait::async_trait;
use tokio::{
    io::{AsyncWrite, AsyncWriteExt, BufWriter, Stdout},
    sync::mpsc,
};

/// Destination for rendered event lines.
///
/// The multiplexer owns its sink exclusively, so implementations need no
/// internal locking.
#[async_trait]
pub trait OutputSink: Send {
    /// Write one line. The sink appends the line terminator.
    async fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// Sink over any async writer, flushed after every line.
pub struct WriterSink<W> {
    writer: BufWriter<W>,
}

impl<W: AsyncWrite + Send + Unpin> WriterSink<W> {
    /// Create a new writer sink.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl WriterSink<Stdout> {
    /// Sink writing to the process's standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

#[async_trait]
impl<W: AsyncWrite + Send + Unpin> OutputSink for WriterSink<W> {
    async fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// Sink forwarding each line over a channel.
///
/// Useful for embedding the server or inspecting its output in tests.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    /// Create a sink and the receiver its lines arrive on.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl OutputSink for ChannelSink {
    async fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.tx
            .send(line.to_owned())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "line receiver dropped"))
    }
}
