//! Request orchestration: fetch, normalize, render.

use crate::{
    template::{normalize, render_with_label, RenderedPrompt, UnresolvableTemplate},
    traits::TemplateSource,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Any failure while handling one request.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The template could not be fetched from the registry.
    #[error("failed to fetch prompt config: {0}")]
    RemoteConfig(String),

    /// The fetched template matched no normalization rule.
    #[error(transparent)]
    TemplateUnresolvable(#[from] UnresolvableTemplate),
}

impl RequestError {
    /// Short reason safe to show the user, distinct per failure kind.
    pub fn user_message(&self) -> String {
        match self {
            Self::RemoteConfig(reason) => {
                format!("Could not load the prompt template from the registry: {reason}")
            }
            Self::TemplateUnresolvable(_) => {
                "The prompt template has an unsupported format and could not be read.".to_string()
            }
        }
    }
}

/// Sequences a single request. Holds no per-request state.
pub struct Orchestrator {
    source: Arc<dyn TemplateSource>,
    app_slug: String,
    environment_slug: String,
    input_label: String,
}

impl Orchestrator {
    pub fn new(
        source: Arc<dyn TemplateSource>,
        app_slug: impl Into<String>,
        environment_slug: impl Into<String>,
        input_label: impl Into<String>,
    ) -> Self {
        Self {
            source,
            app_slug: app_slug.into(),
            environment_slug: environment_slug.into(),
            input_label: input_label.into(),
        }
    }

    /// Turn one user message into a rendered prompt.
    ///
    /// A fetch failure is returned immediately; nothing is retried.
    pub async fn handle_request(&self, user_input: &str) -> Result<RenderedPrompt, RequestError> {
        let template = self
            .source
            .fetch_template(&self.app_slug, &self.environment_slug)
            .await
            .map_err(|e| RequestError::RemoteConfig(e.to_string()))?;

        info!(
            "loaded {} template from {} ({}/{})",
            template.kind(),
            self.source.name(),
            self.app_slug,
            self.environment_slug
        );

        let normalized = normalize(&template)?;
        debug!("normalized template: {} chars", normalized.as_str().chars().count());

        Ok(render_with_label(&normalized, user_input, &self.input_label))
    }
}
