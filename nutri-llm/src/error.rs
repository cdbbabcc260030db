//! Provider error types.

use thiserror::Error;

/// Errors a single provider call can produce.
///
/// These never leave the orchestrator: each one is logged and counted as a
/// failed attempt.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Transport-level failure (DNS, connect, TLS, reset).
    #[error("provider request failed: {0}")]
    RequestFailed(String),

    /// Non-success HTTP status other than auth and rate limiting.
    #[error("provider returned HTTP {status}: {body}")]
    Http {
        /// Status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// Request timed out.
    #[error("provider request timed out after {0}ms")]
    Timeout(u64),

    /// Credentials were rejected (401/403).
    #[error("provider rejected credentials")]
    Unauthorized,

    /// Quota or rate limit hit (429).
    #[error("provider rate limit exceeded")]
    RateLimited,

    /// Response decoded but carried no usable text.
    #[error("provider returned an empty response")]
    EmptyResponse,

    /// Caller passed a blank prompt.
    #[error("prompt must not be empty")]
    EmptyPrompt,

    /// Response body was not the JSON shape the adapter expects.
    #[error("failed to decode provider response: {0}")]
    ParseError(String),

    /// Adapter could not be built (missing key, bad base URL, client error).
    #[error("provider configuration error: {0}")]
    ConfigError(String),
}

impl LlmError {
    /// Map a non-success status to the matching variant.
    #[must_use]
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Unauthorized,
            429 => Self::RateLimited,
            _ => Self::Http {
                status,
                body: truncate(body, 512),
            },
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(0)
        } else if err.is_decode() {
            LlmError::ParseError(err.to_string())
        } else {
            LlmError::RequestFailed(err.to_string())
        }
    }
}

fn truncate(mut body: String, max: usize) -> String {
    if body.len() > max {
        let mut cut = max;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_and_quota_statuses() {
        assert!(matches!(LlmError::from_status(401, String::new()), LlmError::Unauthorized));
        assert!(matches!(LlmError::from_status(403, String::new()), LlmError::Unauthorized));
        assert!(matches!(LlmError::from_status(429, String::new()), LlmError::RateLimited));
        assert!(matches!(
            LlmError::from_status(503, "busy".into()),
            LlmError::Http { status: 503, .. }
        ));
    }

    #[test]
    fn long_bodies_are_truncated_on_char_boundary() {
        let body = "é".repeat(400);
        match LlmError::from_status(500, body) {
            LlmError::Http { body, .. } => assert!(body.len() <= 512),
            other => panic!("unexpected {other:?}"),
        }
    }
}
