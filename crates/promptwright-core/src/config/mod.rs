mod channels;
mod defaults;
mod messages;
mod remote;

#[cfg(test)]
mod tests;

pub use channels::*;
pub use messages::*;
pub use remote::*;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::PromptError;
use defaults::*;

/// Top-level Promptwright configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub messages: Messages,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Fallback log filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for daily-rolling log files. Unset = stdout only.
    #[serde(default)]
    pub log_dir: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

/// Rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Label placed before the user's text when the template has no placeholder.
    #[serde(default = "default_input_label")]
    pub input_label: String,
    /// Messages shorter than this (after trimming) get the `too_short` reply. 0 = off.
    #[serde(default)]
    pub min_input_chars: usize,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            input_label: default_input_label(),
            min_input_chars: 0,
        }
    }
}

/// Liveness listener -- answers `200 OK` to any GET.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_health_host")]
    pub host: String,
    #[serde(default = "default_health_port")]
    pub port: u16,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_health_host(),
            port: default_health_port(),
        }
    }
}

impl Config {
    /// Overlay values from the environment.
    ///
    /// `lookup` is usually `std::env::var(..).ok()`; empty values are ignored.
    /// Recognized: `BOT_TOKEN` / `TELEGRAM_BOT_TOKEN`, `AGENTA_API_KEY`,
    /// `AGENTA_HOST`, `AGENTA_APP_SLUG`, `AGENTA_ENVIRONMENT`, `PORT`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), PromptError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get("BOT_TOKEN").or_else(|| get("TELEGRAM_BOT_TOKEN")) {
            let tg = self.channel.telegram.get_or_insert_with(|| TelegramConfig {
                enabled: true,
                ..Default::default()
            });
            tg.bot_token = token;
        }
        if let Some(key) = get("AGENTA_API_KEY") {
            self.remote.api_key = key;
        }
        if let Some(host) = get("AGENTA_HOST") {
            self.remote.host = host;
        }
        if let Some(slug) = get("AGENTA_APP_SLUG") {
            self.remote.app_slug = slug;
        }
        if let Some(env) = get("AGENTA_ENVIRONMENT") {
            self.remote.environment_slug = env;
        }
        if let Some(port) = get("PORT") {
            self.health.port = port
                .trim()
                .parse()
                .map_err(|e| PromptError::Config(format!("invalid PORT '{port}': {e}")))?;
        }
        Ok(())
    }

    /// Check that everything needed to serve requests is present.
    pub fn validate(&self) -> Result<(), PromptError> {
        if let Some(ref tg) = self.channel.telegram {
            if tg.enabled && tg.bot_token.is_empty() {
                return Err(PromptError::Config(
                    "Telegram is enabled but bot_token is empty. \
                     Set it in config.toml or the BOT_TOKEN env var."
                        .into(),
                ));
            }
        }
        self.validate_remote()
    }

    /// Check only the registry settings (enough for one-shot rendering).
    pub fn validate_remote(&self) -> Result<(), PromptError> {
        if self.remote.host.trim().is_empty() {
            return Err(PromptError::Config(
                "remote.host is empty. Set it in config.toml or the AGENTA_HOST env var.".into(),
            ));
        }
        if self.remote.api_key.is_empty() {
            return Err(PromptError::Config(
                "remote.api_key is empty. Set it in config.toml or the AGENTA_API_KEY env var."
                    .into(),
            ));
        }
        Ok(())
    }
}

/// Parse configuration from TOML text.
pub fn parse(content: &str) -> Result<Config, PromptError> {
    toml::from_str(content).map_err(|e| PromptError::Config(format!("failed to parse config: {e}")))
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    /// The file did not exist.
    Defaults,
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist. Does not log; the
/// caller reports the returned [`ConfigSource`] once logging is up.
pub fn load(path: &str) -> Result<(Config, ConfigSource), PromptError> {
    let path = Path::new(path);
    if !path.exists() {
        return Ok((Config::default(), ConfigSource::Defaults));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| PromptError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    Ok((parse(&content)?, ConfigSource::File))
}
