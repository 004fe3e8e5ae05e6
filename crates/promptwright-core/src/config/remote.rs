use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::defaults::*;

/// What the bot replies with once a prompt is rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteMode {
    /// Reply with the rendered prompt itself (default).
    #[default]
    Render,
    /// Send the rendered prompt to the registry's run endpoint and reply with its output.
    Run,
}

/// Remote prompt registry (Agenta) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_remote_host")]
    pub host: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_app_slug")]
    pub app_slug: String,
    #[serde(default = "default_environment_slug")]
    pub environment_slug: String,
    /// Key of the template inside the fetched config parameters.
    #[serde(default = "default_prompt_key")]
    pub prompt_key: String,
    /// Deadline for a single registry request.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub mode: RemoteMode,
    /// Input name that receives the rendered prompt in run mode.
    #[serde(default = "default_run_input_key")]
    pub run_input_key: String,
    /// Extra static inputs sent along in run mode.
    #[serde(default = "default_run_inputs")]
    pub run_inputs: HashMap<String, String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: default_remote_host(),
            api_key: String::new(),
            app_slug: default_app_slug(),
            environment_slug: default_environment_slug(),
            prompt_key: default_prompt_key(),
            timeout_secs: default_timeout_secs(),
            mode: RemoteMode::default(),
            run_input_key: default_run_input_key(),
            run_inputs: default_run_inputs(),
        }
    }
}
