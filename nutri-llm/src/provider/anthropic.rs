//! Anthropic Messages API adapter.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use nutri_core::config::ProviderSettings;

use super::{Endpoint, ProviderAdapter, ensure_prompt, non_blank, send_json};
use crate::error::LlmError;
use crate::types::{CompletionRequest, ProviderKind};

/// Fast, inexpensive default model.
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
/// Public API root.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
/// Value of the `anthropic-version` header.
pub const API_VERSION: &str = "2023-06-01";
/// Output token cap per call.
pub const MAX_TOKENS: u32 = 2000;

/// Calls `POST {base}/v1/messages`.
#[derive(Debug, Clone)]
pub struct AnthropicAdapter {
    endpoint: Endpoint,
}

impl AnthropicAdapter {
    /// Build from settings.
    ///
    /// # Errors
    ///
    /// `ConfigError` when the key is missing or the HTTP client cannot be built.
    pub fn from_settings(settings: &ProviderSettings, timeout: Duration) -> Result<Self, LlmError> {
        let endpoint = Endpoint::resolve(
            ProviderKind::Anthropic,
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
        let mut body = json!({
            "model": self.endpoint.model,
            "max_tokens": MAX_TOKENS,
            "messages": [{ "role": "user", "content": request.prompt }],
        });
        if let Some(system) = request.system_text() {
            body["system"] = json!(system);
        }
        body
    }
}

/// Concatenate every `text` block of a Messages response.
fn extract_text(json: &Value) -> String {
    json["content"]
        .as_array()
        .map(|blocks| {
            blocks
                .iter()
                .filter_map(|b| b["text"].as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    async fn call(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        ensure_prompt(request)?;
        let url = format!("{}/v1/messages", self.endpoint.base_url);
        debug!(model = %self.endpoint.model, "anthropic request");

        let builder = self
            .endpoint
            .http
            .post(&url)
            .header("x-api-key", &self.endpoint.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&self.body(request));

        let json = send_json(builder, request.timeout).await?;
        non_blank(extract_text(&json))
    }
}
