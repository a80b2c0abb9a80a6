//! Core building blocks for the jeanserv TCP server.
//!
//! This crate provides:
//! - `ServerConfig` - Immutable configuration shared by every component
//! - `Event`, `EventSender`, `EventReceivers` - Fan-in channels to the multiplexer
//! - `CommandTable` - Pluggable literal and namespaced commands
//! - `Palette` - Console and reply decoration

pub mod commands;
pub mod config;
pub mod decorate;
pub mod error;
pub mod event;

pub use commands::{CommandHandler, CommandRequest, CommandTable, Reply, from_fn};
pub use config::ServerConfig;
pub use decorate::{Palette, Tone};
pub use error::{ConfigError, ServerError};
pub use event::{Event, EventReceivers, EventSender};
