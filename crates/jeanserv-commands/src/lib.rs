//! Built-in commands for the jeanserv TCP server.
//!
//! Provides:
//! - `ping` - Liveness check
//! - `help` - Lists registered commands
//! - `ascii:<text>` - FIGlet rendering of the argument

pub mod ascii;
pub mod help;
pub mod ping;

use jeanserv_core::CommandTable;

pub use ascii::{ArtError, AsciiArt};
pub use help::Help;
pub use ping::Ping;

/// Table with every built-in command registered.
///
/// # Errors
/// Returns error if the FIGlet font cannot be loaded.
pub fn default_table() -> Result<CommandTable, ArtError> {
    let mut table = CommandTable::new();
    table
        .register_literal("ping", Ping)
        .register_namespace("ascii", AsciiArt::standard()?);
    let help = Help::for_table(&table);
    table.register_literal("help", help);
    Ok(table)
}
