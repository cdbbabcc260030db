//! Core types for provider requests and responses.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The providers the advisor knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Anthropic Messages API.
    Anthropic,
    /// Google Gemini.
    Gemini,
    /// `OpenAI` chat completions.
    #[serde(rename = "openai")]
    OpenAi,
}

impl ProviderKind {
    /// Preference order: most stable first, most rate-capped last.
    pub const PRIORITY: [ProviderKind; 3] = [Self::Anthropic, Self::Gemini, Self::OpenAi];

    /// Lowercase name used in logs and config sections.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which advisory capability a request serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Free-form conversation.
    Chat,
    /// Eating behavior analysis.
    Analyze,
    /// Targeted recommendations.
    Recommend,
    /// Meal plan generation.
    Plan,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Chat => "chat",
            Self::Analyze => "analyze",
            Self::Recommend => "recommend",
            Self::Plan => "plan",
        };
        f.write_str(name)
    }
}

/// A single prompt to send down the provider chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// User prompt. Must be non-blank.
    pub prompt: String,
    /// Optional system instructions.
    pub system: Option<String>,
    /// Hard bound on each provider call.
    pub timeout: Duration,
}

impl CompletionRequest {
    /// Default per-call timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// A request with no system instructions and the default timeout.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Attach system instructions.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Override the per-call timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// System text only when it is non-blank.
    #[must_use]
    pub fn system_text(&self) -> Option<&str> {
        self.system.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Whole milliseconds of a duration, for logs and error values.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

/// The first usable answer the chain produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Raw provider text (non-blank).
    pub text: String,
    /// Provider that produced it.
    pub provider: ProviderKind,
    /// Attempts spent across all providers, including the successful one.
    pub attempts: u32,
    /// Wall time of the whole orchestrated call.
    pub latency_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order_is_fixed() {
        assert_eq!(
            ProviderKind::PRIORITY,
            [ProviderKind::Anthropic, ProviderKind::Gemini, ProviderKind::OpenAi]
        );
    }

    #[test]
    fn blank_system_is_ignored() {
        let req = CompletionRequest::new("hi").with_system("  ");
        assert_eq!(req.system_text(), None);
        let req = CompletionRequest::new("hi").with_system("be brief");
        assert_eq!(req.system_text(), Some("be brief"));
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&ProviderKind::OpenAi).expect("serializes");
        assert_eq!(json, "\"openai\"");
    }
}
