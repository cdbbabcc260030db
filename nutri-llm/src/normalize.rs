//! Response normalization and JSON extraction.
//!
//! Models wrap answers in markdown fences and surround JSON with prose.
//! Plain-text answers get their fence markers stripped; structured answers
//! are located by the widest brace span (first `{` to last `}`), which is
//! parsed and must be an object. Anything else is an [`ExtractionError`]
//! and the caller falls back to the rule engine.

use serde_json::{Map, Value};
use thiserror::Error;

/// What the caller wants out of the raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedShape {
    /// Free text.
    PlainText,
    /// A single JSON object.
    JsonObject,
}

/// A normalized provider answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// Cleaned text.
    Text(String),
    /// Parsed object.
    Object(Map<String, Value>),
}

impl Normalized {
    /// The text, if this is [`Normalized::Text`].
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(t) => Some(t),
            Self::Object(_) => None,
        }
    }

    /// The object, if this is [`Normalized::Object`].
    #[must_use]
    pub fn into_object(self) -> Option<Map<String, Value>> {
        match self {
            Self::Object(o) => Some(o),
            Self::Text(_) => None,
        }
    }
}

/// Why a raw answer could not be normalized.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// Nothing left after cleanup.
    #[error("response is empty after cleanup")]
    Empty,
    /// No `{ ... }` span in the text.
    #[error("no JSON object found in response")]
    NoJsonSpan,
    /// The span did not parse.
    #[error("invalid JSON in response: {0}")]
    InvalidJson(String),
    /// The span parsed to something other than an object.
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// Turns raw provider text into the expected shape.
pub trait Normalizer: Send + Sync {
    /// Normalize `raw`.
    ///
    /// # Errors
    ///
    /// When the text cannot be brought into `shape`.
    fn normalize(&self, raw: &str, shape: ExpectedShape) -> Result<Normalized, ExtractionError>;
}

/// Fence stripping plus widest-brace-span JSON extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct BraceSpanNormalizer;

impl Normalizer for BraceSpanNormalizer {
    fn normalize(&self, raw: &str, shape: ExpectedShape) -> Result<Normalized, ExtractionError> {
        match shape {
            ExpectedShape::PlainText => {
                let text = strip_code_fences(raw);
                if text.is_empty() {
                    Err(ExtractionError::Empty)
                } else {
                    Ok(Normalized::Text(text))
                }
            }
            ExpectedShape::JsonObject => extract_object(raw).map(Normalized::Object),
        }
    }
}

/// Remove ```` ```json ```` / ```` ``` ```` markers (and the whitespace after
/// them) anywhere in the text, then trim.
#[must_use]
pub fn strip_code_fences(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find("```") {
        out.push_str(&rest[..pos]);
        let mut after = &rest[pos + 3..];
        if after.starts_with("json") {
            after = &after[4..];
        }
        rest = after.trim_start();
    }
    out.push_str(rest);
    out.trim().to_string()
}

/// The widest `{ ... }` span: first `{` through last `}`.
#[must_use]
pub fn brace_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

/// Extract and parse the widest brace span as a JSON object.
///
/// # Errors
///
/// No span, invalid JSON, or a non-object value.
pub fn extract_object(raw: &str) -> Result<Map<String, Value>, ExtractionError> {
    let span = brace_span(raw).ok_or(ExtractionError::NoJsonSpan)?;
    let value: Value =
        serde_json::from_str(span).map_err(|e| ExtractionError::InvalidJson(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Err(ExtractionError::NotAnObject("null")),
        Value::Bool(_) => Err(ExtractionError::NotAnObject("boolean")),
        Value::Number(_) => Err(ExtractionError::NotAnObject("number")),
        Value::String(_) => Err(ExtractionError::NotAnObject("string")),
        Value::Array(_) => Err(ExtractionError::NotAnObject("array")),
    }
}
