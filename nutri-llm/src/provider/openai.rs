//! `OpenAI` chat completions adapter.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use nutri_core::config::ProviderSettings;

use super::{Endpoint, ProviderAdapter, ensure_prompt, non_blank, send_json};
use crate::error::LlmError;
use crate::types::{CompletionRequest, ProviderKind};

/// Inexpensive default model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Public API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
/// Sampling temperature.
pub const TEMPERATURE: f64 = 0.7;

/// Calls `POST {base}/v1/chat/completions`.
#[derive(Debug, Clone)]
pub struct OpenAiAdapter {
    endpoint: Endpoint,
}

impl OpenAiAdapter {
    /// Build from settings.
    ///
    /// # Errors
    ///
    /// `ConfigError` when the key is missing or the HTTP client cannot be built.
    pub fn from_settings(settings: &ProviderSettings, timeout: Duration) -> Result<Self, LlmError> {
        let endpoint = Endpoint::resolve(
            ProviderKind::OpenAi,
            settings,
            DEFAULT_MODEL,
            DEFAULT_BASE_URL,
            timeout,
        )?;
        Ok(Self { endpoint })
    }

    /// Model this adapter sends requests to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.endpoint.model
    }

    fn body(&self, request: &CompletionRequest) -> Value {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system_text() {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": request.prompt }));
        json!({
            "model": self.endpoint.model,
            "messages": messages,
            "temperature": TEMPERATURE,
        })
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn call(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        ensure_prompt(request)?;
        let url = format!("{}/v1/chat/completions", self.endpoint.base_url);
        debug!(model = %self.endpoint.model, "openai request");

        let builder = self
            .endpoint
            .http
            .post(&url)
            .bearer_auth(&self.endpoint.api_key)
            .json(&self.body(request));

        let json = send_json(builder, request.timeout).await?;
        let text = json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        non_blank(text)
    }
}
