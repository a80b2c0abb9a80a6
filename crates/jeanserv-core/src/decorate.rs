//! Console and reply decoration.

use crossterm::style::{Color, Stylize};

/// What a piece of text is, which decides its colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Operational log events.
    Log,
    /// Session events.
    Session,
    /// Error events.
    Error,
    /// Idle heartbeat.
    Idle,
    /// Replies written to clients.
    Reply,
    /// ASCII art written to clients.
    Art,
    /// De-emphasised text.
    Muted,
}

impl Tone {
    const fn color(self) -> Color {
        match self {
            Self::Log | Self::Art => Color::Blue,
            Self::Session => Color::Yellow,
            Self::Error => Color::Red,
            Self::Idle => Color::Green,
            Self::Reply => Color::Magenta,
            Self::Muted => Color::Grey,
        }
    }
}

/// Text decorator.
///
/// `Copy` so it can be handed to every session and command by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    /// Palette that leaves text untouched.
    #[must_use]
    pub const fn plain() -> Self {
        Self { enabled: false }
    }

    /// Palette that wraps text in ANSI colour sequences.
    #[must_use]
    pub const fn colored() -> Self {
        Self { enabled: true }
    }

    /// Paint `text` in the colour of `tone`.
    #[must_use]
    pub fn paint(self, tone: Tone, text: &str) -> String {
        if self.enabled {
            text.with(tone.color()).to_string()
        } else {
            text.to_owned()
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::colored()
    }
}
