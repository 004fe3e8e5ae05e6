//! Agenta prompt registry client.
//!
//! Fetches deployed configs with `POST /api/variants/configs/fetch` and runs
//! prompts with `POST /api/variants/run`. One HTTP attempt per call; the
//! request deadline comes from `remote.timeout_secs`.

use async_trait::async_trait;
use promptwright_core::{
    config::RemoteConfig,
    error::PromptError,
    template::TemplateValue,
    traits::{PromptRunner, TemplateSource},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client for a self-hosted or cloud Agenta instance.
#[derive(Clone)]
pub struct AgentaClient {
    client: reqwest::Client,
    host: String,
    api_key: String,
    prompt_key: String,
    run_input_key: String,
    run_inputs: HashMap<String, String>,
}

impl std::fmt::Debug for AgentaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentaClient")
            .field("host", &self.host)
            .field("api_key", &"[REDACTED]")
            .field("prompt_key", &self.prompt_key)
            .finish()
    }
}

#[derive(Serialize)]
struct SlugRef<'a> {
    slug: &'a str,
}

#[derive(Serialize)]
struct FetchConfigRequest<'a> {
    application_ref: SlugRef<'a>,
    environment_ref: SlugRef<'a>,
}

#[derive(Deserialize)]
struct FetchConfigResponse {
    #[serde(default)]
    params: Option<serde_json::Map<String, Value>>,
}

#[derive(Serialize)]
struct RunRequest<'a> {
    inputs: HashMap<&'a str, &'a str>,
}

impl AgentaClient {
    /// Create from config values.
    pub fn from_config(config: &RemoteConfig) -> Result<Self, PromptError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PromptError::Remote(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            host: config.host.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            prompt_key: config.prompt_key.clone(),
            run_input_key: config.run_input_key.clone(),
            run_inputs: config.run_inputs.clone(),
        })
    }

    /// POST a JSON body and return the parsed JSON response.
    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, PromptError> {
        let url = format!("{}{path}", self.host);
        debug!("agenta: POST {url}");

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("ApiKey {}", self.api_key))
            .json(body)
            .send()
            .await
            .map_err(|e| PromptError::Remote(format!("agenta request failed: {e}")))?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            let reason = extract_error_message(&text).unwrap_or_else(|| {
                if text.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                } else {
                    text.clone()
                }
            });
            return Err(PromptError::Remote(format!("agenta returned {status}: {reason}")));
        }

        serde_json::from_str(&text)
            .map_err(|e| PromptError::Remote(format!("agenta: failed to parse response: {e}")))
    }

    /// Fetch the config parameters deployed for `app_slug` in `environment_slug`.
    pub async fn fetch_config(
        &self,
        app_slug: &str,
        environment_slug: &str,
    ) -> Result<serde_json::Map<String, Value>, PromptError> {
        let body = FetchConfigRequest {
            application_ref: SlugRef { slug: app_slug },
            environment_ref: SlugRef {
                slug: environment_slug,
            },
        };
        let value = self.post_json("/api/variants/configs/fetch", &body).await?;
        let parsed: FetchConfigResponse = serde_json::from_value(value)?;
        parsed.params.ok_or_else(|| {
            PromptError::Remote(format!(
                "no config deployed for {app_slug} in {environment_slug}"
            ))
        })
    }
}

/// Pull a readable message out of an error body (`detail` or `message`).
fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<Value>(body).ok()?;
    ["detail", "message"].iter().find_map(|key| match parsed.get(*key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(v @ (Value::Object(_) | Value::Array(_))) => Some(v.to_string()),
        _ => None,
    })
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

#[async_trait]
impl TemplateSource for AgentaClient {
    fn name(&self) -> &str {
        "agenta"
    }

    async fn fetch_template(
        &self,
        app_slug: &str,
        environment_slug: &str,
    ) -> Result<TemplateValue, PromptError> {
        let params = self.fetch_config(app_slug, environment_slug).await?;
        match params.get(&self.prompt_key) {
            Some(value) if !is_blank(value) => Ok(TemplateValue::from(value.clone())),
            _ => {
                warn!(
                    "agenta config for {app_slug}/{environment_slug} has no '{}' key",
                    self.prompt_key
                );
                Err(PromptError::Remote(format!(
                    "key '{}' not found in Agenta config",
                    self.prompt_key
                )))
            }
        }
    }
}

#[async_trait]
impl PromptRunner for AgentaClient {
    async fn run(&self, prompt: &str) -> Result<String, PromptError> {
        let mut inputs: HashMap<&str, &str> = self
            .run_inputs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        inputs.insert(self.run_input_key.as_str(), prompt);

        let value = self
            .post_json("/api/variants/run", &RunRequest { inputs })
            .await?;

        let text = value
            .get("outputs")
            .and_then(|o| o.get("response"))
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(PromptError::Remote("no response from Agenta run".into()));
        }
        Ok(text.to_string())
    }
}
