//! Outgoing Bot API calls: send, edit, command registration.

use super::types::{TgResponse, TgSentMessage};
use super::TelegramChannel;
use promptwright_core::error::PromptError;
use tracing::{info, warn};

/// Telegram's maximum message length, in UTF-16 code units.
pub(crate) const MAX_MESSAGE_LEN: usize = 4096;

impl TelegramChannel {
    /// POST a Bot API method and decode its `result`.
    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> Result<T, PromptError> {
        let url = format!("{}/{method}", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| PromptError::Channel(format!("telegram {method} failed: {e}")))?;

        let status = resp.status();
        let parsed: TgResponse<T> = resp.json().await.map_err(|e| {
            PromptError::Channel(format!("telegram {method} got {status}, unreadable body: {e}"))
        })?;

        if !parsed.ok {
            return Err(PromptError::Channel(format!(
                "telegram {method} error: {}",
                parsed.description.unwrap_or_default()
            )));
        }
        parsed
            .result
            .ok_or_else(|| PromptError::Channel(format!("telegram {method} returned no result")))
    }

    /// Send a text message, split into chunks if needed.
    ///
    /// Returns the message ID of the first chunk.
    pub(crate) async fn send_message(&self, chat_id: i64, text: &str) -> Result<i64, PromptError> {
        let mut first_id = None;
        for chunk in split_message(text, MAX_MESSAGE_LEN) {
            let sent: TgSentMessage = self
                .call(
                    "sendMessage",
                    &serde_json::json!({
                        "chat_id": chat_id,
                        "text": chunk,
                    }),
                )
                .await?;
            first_id.get_or_insert(sent.message_id);
        }
        first_id.ok_or_else(|| PromptError::Channel("telegram sendMessage: empty text".into()))
    }

    /// Replace a message's text. Overflow beyond one message is sent as new
    /// messages; once the edit succeeds, overflow failures are only logged.
    pub(crate) async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<(), PromptError> {
        let chunks = split_message(text, MAX_MESSAGE_LEN);
        let (first, rest) = chunks
            .split_first()
            .ok_or_else(|| PromptError::Channel("telegram editMessageText: empty text".into()))?;

        let _: serde_json::Value = self
            .call(
                "editMessageText",
                &serde_json::json!({
                    "chat_id": chat_id,
                    "message_id": message_id,
                    "text": first,
                }),
            )
            .await?;

        for chunk in rest {
            if let Err(e) = self.send_message(chat_id, chunk).await {
                warn!("telegram: edited message {message_id} but overflow send failed: {e}");
                break;
            }
        }
        Ok(())
    }

    /// Register bot commands with Telegram so users see an autocomplete menu.
    /// Best-effort: logs failures but does not propagate errors.
    pub(crate) async fn register_commands(&self) {
        let commands = serde_json::json!({
            "commands": [
                { "command": "start", "description": "Start the bot" },
                { "command": "help", "description": "How to use the bot" },
            ]
        });

        match self
            .call::<serde_json::Value>("setMyCommands", &commands)
            .await
        {
            Ok(_) => info!("registered Telegram bot commands"),
            Err(e) => warn!("failed to register Telegram bot commands: {e}"),
        }
    }
}

/// Split a long message into chunks that respect Telegram's limit.
///
/// `max_len` counts UTF-16 code units, as Telegram does. Prefers breaking
/// after a newline and never splits inside a character.
pub(crate) fn split_message(text: &str, max_len: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = text;

    while utf16_len(rest) > max_len {
        let mut units = 0;
        let mut end = 0;
        let mut after_newline = None;
        for (i, c) in rest.char_indices() {
            units += c.len_utf16();
            if units > max_len {
                break;
            }
            end = i + c.len_utf8();
            if c == '\n' {
                after_newline = Some(end);
            }
        }
        let mut break_at = after_newline.unwrap_or(end);
        if break_at == 0 {
            // A single character wider than the limit still has to go out.
            break_at = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        chunks.push(&rest[..break_at]);
        rest = &rest[break_at..];
    }

    chunks.push(rest);
    chunks
}

fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}
