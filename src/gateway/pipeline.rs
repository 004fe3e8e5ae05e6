//! Message processing pipeline: the main handle_message flow.

use super::Gateway;
use crate::commands::Command;
use promptwright_core::message::{IncomingMessage, OutgoingMessage};
use tracing::{error, info, warn};

impl Gateway {
    /// Process a single incoming message through the full pipeline.
    ///
    /// Every outcome ends in a reply; nothing here can take the process down.
    pub(super) async fn handle_message(&self, incoming: IncomingMessage) {
        let preview = if incoming.text.chars().count() > 60 {
            let truncated: String = incoming.text.chars().take(60).collect();
            format!("{truncated}...")
        } else {
            incoming.text.clone()
        };
        info!(
            "[{}] {} says: {}",
            incoming.channel,
            incoming.sender_name.as_deref().unwrap_or("unknown"),
            preview
        );

        // --- 1. COMMANDS ---
        if let Some(cmd) = Command::parse(&incoming.text) {
            info!("command {cmd:?} from {}", incoming.sender_id);
            self.send_text(&incoming, cmd.reply(&self.messages)).await;
            return;
        }

        // --- 2. INPUT LENGTH ---
        let min = self.prompt_config.min_input_chars;
        if min > 0 && incoming.text.trim().chars().count() < min {
            self.send_text(&incoming, &self.messages.too_short).await;
            return;
        }

        // --- 3. STATUS MESSAGE ---
        let status_id = self.send_text(&incoming, &self.messages.working).await;

        // --- 4. BUILD REPLY ---
        let reply = match self.build_prompt(&incoming.text).await {
            Ok(text) => {
                info!("prompt generated for {}", incoming.sender_id);
                format!("{}{text}", self.messages.ready_prefix)
            }
            Err(reason) => format!("{}{reason}", self.messages.error_prefix),
        };

        // --- 5. DELIVER ---
        self.deliver(&incoming, status_id.as_deref(), &reply).await;
    }

    /// Render the prompt, then run it remotely in run mode.
    ///
    /// Errors come back as user-facing text and are logged here.
    pub(super) async fn build_prompt(&self, user_input: &str) -> Result<String, String> {
        let rendered = match self.orchestrator.handle_request(user_input).await {
            Ok(rendered) => rendered,
            Err(e) => {
                error!("error while generating prompt: {e}");
                return Err(e.user_message());
            }
        };

        let Some(runner) = &self.runner else {
            return Ok(rendered.into_string());
        };

        runner.run(rendered.as_str()).await.map_err(|e| {
            error!("remote run failed: {e}");
            format!("Remote run failed: {e}")
        })
    }

    /// Replace the status message with the reply, or send it fresh.
    async fn deliver(&self, incoming: &IncomingMessage, status_id: Option<&str>, text: &str) {
        let Some(channel) = self.channels.get(&incoming.channel) else {
            warn!("no channel named {} for reply", incoming.channel);
            return;
        };

        if let (Some(id), Some(target)) = (status_id, incoming.reply_target.as_deref()) {
            match channel.edit(target, id, text).await {
                Ok(()) => return,
                Err(e) => warn!("failed to edit status message, sending new one: {e}"),
            }
        }

        if let Err(e) = channel.send(OutgoingMessage::reply_to(incoming, text)).await {
            error!("failed to deliver reply on {}: {e}", incoming.channel);
        }
    }
}
