use crate::{
    error::PromptError,
    message::{IncomingMessage, OutgoingMessage},
    template::TemplateValue,
};
use async_trait::async_trait;

/// Remote prompt registry: where templates live.
///
/// Implementations own transport, authentication, and deadlines. The core
/// only needs a [`TemplateValue`] back.
#[async_trait]
pub trait TemplateSource: Send + Sync {
    /// Human-readable source name.
    fn name(&self) -> &str;

    /// Fetch the prompt template deployed for an app in an environment.
    async fn fetch_template(
        &self,
        app_slug: &str,
        environment_slug: &str,
    ) -> Result<TemplateValue, PromptError>;
}

/// Remote execution of a rendered prompt, producing output text.
#[async_trait]
pub trait PromptRunner: Send + Sync {
    /// Run the prompt remotely and return the generated text.
    async fn run(&self, prompt: &str) -> Result<String, PromptError>;
}

/// Messaging Channel trait.
///
/// Every messaging platform implements this trait to receive and send
/// messages.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming messages.
    /// Returns a receiver that yields incoming messages.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, PromptError>;

    /// Send a message back through this channel.
    ///
    /// Returns the platform message ID when the platform reports one, so
    /// the message can be edited later.
    async fn send(&self, message: OutgoingMessage) -> Result<Option<String>, PromptError>;

    /// Replace the text of a previously sent message.
    ///
    /// Platforms without editing fall back to sending a new message.
    async fn edit(&self, target: &str, _message_id: &str, text: &str) -> Result<(), PromptError> {
        self.send(OutgoingMessage {
            text: text.to_string(),
            reply_target: Some(target.to_string()),
        })
        .await
        .map(|_| ())
    }

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), PromptError>;
}
