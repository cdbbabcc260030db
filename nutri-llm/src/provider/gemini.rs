//! Google Gemini `generateContent` adapter.
//!
//! Gemini gets a single prompt string with any system text folded in front
//! of it. Some flash-class models reject long folded prompts, so a failed
//! call is repeated once with the bare prompt before the error is returned.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, warn};

use nutri_core::config::ProviderSettings;

use super::{Endpoint, ProviderAdapter, ensure_prompt, send_json};
use crate::error::LlmError;
use crate::types::{CompletionRequest, ProviderKind};

/// Fast free-tier default model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Public API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Calls `POST {base}/v1beta/models/{model}:generateContent`.
#[derive(Debug, Clone)]
pub struct GeminiAdapter {
    endpoint: Endpoint,
}

impl GeminiAdapter {
    /// Build from settings.
    ///
    /// # Errors
    ///
    /// `ConfigError` when the key is missing or the HTTP client cannot be built.
    pub fn from_settings(settings: &ProviderSettings, timeout: Duration) -> Result<Self, LlmError> {
        let endpoint = Endpoint::resolve(
            ProviderKind::Gemini,
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

    async fn generate(&self, text: &str, timeout: Duration) -> Result<String, LlmError> {
        let model = self.endpoint.model.trim_start_matches("models/");
        let url = format!("{}/v1beta/models/{model}:generateContent", self.endpoint.base_url);
        let body = json!({ "contents": [{ "parts": [{ "text": text }] }] });

        let builder = self
            .endpoint
            .http
            .post(&url)
            .query(&[("key", self.endpoint.api_key.as_str())])
            .json(&body);

        let json = send_json(builder, timeout).await?;
        extract_text(&json)
    }
}

/// Fold system instructions in front of the prompt.
fn fold_system(request: &CompletionRequest) -> String {
    match request.system_text() {
        Some(system) => format!("{system}\n\n{}", request.prompt),
        None => request.prompt.clone(),
    }
}

/// Joined candidate parts, else a top-level `text`.
///
/// A blocked prompt, a missing candidate list or a candidate without text is
/// an `EmptyResponse`: the body is never handed on as if it were an answer.
fn extract_text(json: &Value) -> Result<String, LlmError> {
    if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
        warn!(reason, "gemini blocked the prompt");
        return Err(LlmError::EmptyResponse);
    }
    let parts = json["candidates"][0]["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p["text"].as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();
    if !parts.trim().is_empty() {
        return Ok(parts);
    }
    let text = json["text"].as_str().unwrap_or_default();
    if text.trim().is_empty() {
        if let Some(finish) = json["candidates"][0]["finishReason"].as_str() {
            debug!(finish, "gemini candidate carried no text");
        }
        return Err(LlmError::EmptyResponse);
    }
    Ok(text.to_string())
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    /// Two sequential requests may be needed, each bounded by the timeout.
    fn attempt_budget(&self, timeout: Duration) -> Duration {
        timeout.saturating_mul(2)
    }

    async fn call(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        ensure_prompt(request)?;
        debug!(model = %self.endpoint.model, "gemini request");

        match self.generate(&fold_system(request), request.timeout).await {
            Ok(text) => Ok(text),
            Err(first) if request.system_text().is_some() => {
                warn!(error = %first, "gemini call failed, retrying without system instructions");
                // Surface the original failure if the bare prompt fails too.
                self.generate(&request.prompt, request.timeout)
                    .await
                    .map_err(|_| first)
            }
            Err(e) => Err(e),
        }
    }
}
