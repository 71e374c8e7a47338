//! Events that can occur in a dialogue

use std::fmt;
use std::str::FromStr;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Free-form text that is not a command
    TextInput(String),
    /// Inline button press
    ButtonSelect(ButtonToken),
    Command(Command),
}

impl Event {
    /// Classify an inbound text message as a command or plain input
    pub fn from_text(text: &str) -> Self {
        match Command::parse(text) {
            Some(command) => Event::Command(command),
            None => Event::TextInput(text.to_string()),
        }
    }
}

/// Callback payload carried by inline buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonToken {
    Both,
    MhrOnly,
    Restart,
}

impl ButtonToken {
    pub fn as_str(self) -> &'static str {
        match self {
            ButtonToken::Both => "both",
            ButtonToken::MhrOnly => "mhr_only",
            ButtonToken::Restart => "restart",
        }
    }
}

impl fmt::Display for ButtonToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown button token: {0}")]
pub struct UnknownToken(pub String);

impl FromStr for ButtonToken {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "both" => Ok(ButtonToken::Both),
            "mhr_only" => Ok(ButtonToken::MhrOnly),
            "restart" => Ok(ButtonToken::Restart),
            other => Err(UnknownToken(other.to_string())),
        }
    }
}

/// Slash commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Cancel,
    /// Any other command, name without the slash
    Other(String),
}

impl Command {
    /// Parse `/name`, `/name@bot` or `/name args`; `None` if not a command
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.trim_start().strip_prefix('/')?;
        let word = rest.split(char::is_whitespace).next().unwrap_or_default();
        let name = word.split('@').next().unwrap_or_default();
        if name.is_empty() {
            return None;
        }
        Some(match name {
            "start" => Command::Start,
            "cancel" => Command::Cancel,
            other => Command::Other(other.to_string()),
        })
    }
}
