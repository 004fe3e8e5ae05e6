//! Built-in bot commands: instant responses, no registry call.

use promptwright_core::config::Messages;

/// Known bot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
}

impl Command {
    /// Parse a command from message text.
    ///
    /// Returns `None` for plain text. Unknown `/` commands map to `Help`.
    pub fn parse(text: &str) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        if !first.starts_with('/') {
            return None;
        }
        // Strip @botname suffix (e.g. "/help@prompt_bot" → "/help").
        let cmd = first.split('@').next().unwrap_or(first);
        match cmd {
            "/start" => Some(Self::Start),
            _ => Some(Self::Help),
        }
    }

    /// The reply text for this command.
    pub fn reply(self, messages: &Messages) -> &str {
        match self {
            Self::Start => &messages.start,
            Self::Help => &messages.help,
        }
    }
}
