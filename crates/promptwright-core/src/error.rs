use thiserror::Error;

/// Top-level error type for Promptwright collaborators.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Error from the remote prompt registry (network, auth, not found).
    #[error("remote error: {0}")]
    Remote(String),

    /// Error from a messaging channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
