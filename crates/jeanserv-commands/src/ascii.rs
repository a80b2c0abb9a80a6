//! FIGlet rendering for the `ascii:` namespace and the start-up banner.

use figlet_rs::FIGfont;
use jeanserv_core::{CommandHandler, CommandRequest, Reply, Tone};
use thiserror::Error;

/// ASCII art error.
#[derive(Debug, Error)]
pub enum ArtError {
    #[error("Failed to load FIGlet font: {0}")]
    Font(String),
}

/// Renders text with the standard FIGlet font.
pub struct AsciiArt {
    font: FIGfont,
}

impl std::fmt::Debug for AsciiArt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsciiArt").finish_non_exhaustive()
    }
}

impl AsciiArt {
    /// Load the bundled standard font.
    ///
    /// # Errors
    /// Returns error if the bundled font cannot be parsed.
    pub fn standard() -> Result<Self, ArtError> {
        let font = FIGfont::standard().map_err(ArtError::Font)?;
        Ok(Self { font })
    }

    /// Render `text`, or `None` if nothing in it can be drawn.
    #[must_use]
    pub fn render(&self, text: &str) -> Option<String> {
        let figure = self.font.convert(text)?;
        let art = figure.to_string();
        if art.trim().is_empty() {
            None
        } else {
            Some(art)
        }
    }
}

impl CommandHandler for AsciiArt {
    fn handle(&self, request: &CommandRequest<'_>) -> Option<Reply> {
        let Some(art) = self.render(request.args) else {
            tracing::debug!(peer = %request.peer, "Nothing to render for ascii request");
            return None;
        };
        let lines = art.lines().count();
        let painted = request.palette.paint(Tone::Art, &art);
        Some(
            Reply::text(format!("{painted}\n"))
                .with_summary(format!("ascii art ({lines} lines)")),
        )
    }
}

/// Render `text` with the standard font, for one-off use such as the banner.
#[must_use]
pub fn render(text: &str) -> Option<String> {
    AsciiArt::standard().ok()?.render(text)
}
