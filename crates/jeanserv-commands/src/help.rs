//! Lists the commands a table knows about.

use jeanserv_core::{
    CommandHandler, CommandRequest, CommandTable, Reply, Tone, commands::NAMESPACE_DELIMITER,
};

/// Replies with one registered command per line.
#[derive(Debug, Clone)]
pub struct Help {
    entries: Vec<String>,
}

impl Help {
    /// Snapshot the commands registered in `table`, plus `help` itself.
    #[must_use]
    pub fn for_table(table: &CommandTable) -> Self {
        let mut entries: Vec<String> = table
            .literal_names()
            .map(str::to_owned)
            .chain(std::iter::once("help".to_owned()))
            .chain(
                table
                    .namespace_names()
                    .map(|ns| format!("{ns}{NAMESPACE_DELIMITER}<text>")),
            )
            .collect();
        entries.sort();
        entries.dedup();
        Self { entries }
    }
}

impl CommandHandler for Help {
    fn handle(&self, request: &CommandRequest<'_>) -> Option<Reply> {
        let mut text = String::new();
        for entry in &self.entries {
            text.push_str(&request.palette.paint(Tone::Muted, entry));
            text.push('\n');
        }
        let summary = format!("help ({} commands)", self.entries.len());
        Some(Reply::text(text).with_summary(summary))
    }
}
