//! Error types for the nutrition core library.

use thiserror::Error;

/// Top-level error type for core operations.
///
/// The rule engine itself is infallible; errors only arise while loading
/// configuration or validating caller input.
#[derive(Error, Debug)]
pub enum NutriError {
    /// Configuration could not be parsed or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A value handed over by the caller is outside its valid range.
    #[error("Invalid input: {field} ({reason})")]
    InvalidInput {
        /// Which field was rejected.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, NutriError>;
