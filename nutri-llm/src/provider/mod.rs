//! Provider adapters: one concrete type per external model API.
//!
//! Each adapter owns an HTTP client, its credential and its endpoint. They
//! share the same contract: given a non-blank prompt and optional system
//! instructions, return non-blank text or an [`LlmError`]. Adapters do not
//! retry; bounded retries are the orchestrator's job. The one exception is
//! the Gemini shim that repeats a failed call once without system text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use nutri_core::config::ProviderSettings;

use crate::error::LlmError;
use crate::types::{CompletionRequest, ProviderKind, millis};

pub mod anthropic;
pub mod gemini;
pub mod openai;

pub use anthropic::AnthropicAdapter;
pub use gemini::GeminiAdapter;
pub use openai::OpenAiAdapter;

/// A callable external model.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Which provider this is.
    fn kind(&self) -> ProviderKind;

    /// Wall-clock allowance for one [`call`](Self::call) given the per-request
    /// timeout. Adapters that issue more than one request per call widen it.
    fn attempt_budget(&self, timeout: Duration) -> Duration {
        timeout
    }

    /// Send one prompt and return the model's text.
    ///
    /// # Errors
    ///
    /// Any transport failure, timeout, error status, undecodable body or
    /// blank answer.
    async fn call(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

// ---------------------------------------------------------------------------
// Shared plumbing
// ---------------------------------------------------------------------------

/// Resolved endpoint and credential for one adapter.
#[derive(Debug, Clone)]
pub(crate) struct Endpoint {
    pub http: Client,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl Endpoint {
    /// Resolve settings against adapter defaults.
    pub(crate) fn resolve(
        kind: ProviderKind,
        settings: &ProviderSettings,
        default_model: &str,
        default_base_url: &str,
        connect_timeout: Duration,
    ) -> Result<Self, LlmError> {
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| LlmError::ConfigError(format!("{kind}: no API key configured")))?
            .to_string();

        let http = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| LlmError::ConfigError(format!("{kind}: {e}")))?;

        let model = settings
            .model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default_model.to_string());
        let base_url = settings
            .base_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(default_base_url)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            http,
            api_key,
            model,
            base_url,
        })
    }
}

/// Reject blank prompts before any network traffic.
pub(crate) fn ensure_prompt(request: &CompletionRequest) -> Result<(), LlmError> {
    if request.prompt.trim().is_empty() {
        Err(LlmError::EmptyPrompt)
    } else {
        Ok(())
    }
}

/// Send a prepared request and decode the JSON body of a success response.
pub(crate) async fn send_json(builder: RequestBuilder, timeout: Duration) -> Result<Value, LlmError> {
    let timeout_ms = millis(timeout);

    let response = builder.timeout(timeout).send().await.map_err(|e| {
        if e.is_timeout() {
            LlmError::Timeout(timeout_ms)
        } else {
            LlmError::from(e)
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(LlmError::from_status(status.as_u16(), body));
    }

    response.json::<Value>().await.map_err(|e| {
        if e.is_timeout() {
            LlmError::Timeout(timeout_ms)
        } else {
            LlmError::ParseError(e.to_string())
        }
    })
}

/// Accept only text with at least one non-whitespace character.
pub(crate) fn non_blank(text: String) -> Result<String, LlmError> {
    if text.trim().is_empty() {
        Err(LlmError::EmptyResponse)
    } else {
        Ok(text)
    }
}
