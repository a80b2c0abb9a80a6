//! Concurrent TCP server with a single multiplexed event log.
//!
//! Provides:
//! - `Acceptor` - Listening socket, one detached session per connection
//! - `SessionWorker` - Read, dispatch and reply loop for one client
//! - `EventMultiplexer` - Single consumer writing every event to one sink
//! - `Server` - Starts the acceptor and multiplexer and waits on both

pub mod acceptor;
pub mod multiplexer;
pub mod server;
pub mod session;
pub mod sink;

pub use acceptor::Acceptor;
pub use multiplexer::EventMultiplexer;
pub use server::{Server, ServerHandle};
pub use session::{SessionEnd, SessionWorker};
pub use sink::{ChannelSink, OutputSink, WriterSink};
