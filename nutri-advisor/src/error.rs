//! Advisor error types.
//!
//! Only startup can fail. Once built, every capability returns a value.

use thiserror::Error;

/// Errors raised while building the service or initialising logging.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// Prompt overrides could not be loaded.
    #[error("prompt templates: {0}")]
    Prompts(#[from] nutri_llm::LlmError),

    /// Invalid logging configuration, or a subscriber is already installed.
    #[error("telemetry: {0}")]
    Telemetry(String),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, AdvisorError>;
