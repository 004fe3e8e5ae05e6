use serde::{Deserialize, Serialize};

use super::defaults::*;

/// User-facing reply texts. Defaults are Persian.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Messages {
    /// Reply to `/start`.
    #[serde(default = "default_start_message")]
    pub start: String,
    /// Reply to `/help` and unknown commands.
    #[serde(default = "default_help_message")]
    pub help: String,
    /// Status message shown while the prompt is being built.
    #[serde(default = "default_working_message")]
    pub working: String,
    #[serde(default = "default_ready_prefix")]
    pub ready_prefix: String,
    #[serde(default = "default_error_prefix")]
    pub error_prefix: String,
    #[serde(default = "default_too_short_message")]
    pub too_short: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            start: default_start_message(),
            help: default_help_message(),
            working: default_working_message(),
            ready_prefix: default_ready_prefix(),
            error_prefix: default_error_prefix(),
            too_short: default_too_short_message(),
        }
    }
}
