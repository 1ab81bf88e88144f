//! Groq API client error types.

use std::sync::Arc;

use biascheck_core::Error;

/// Errors from the Groq chat completions client.
#[derive(Debug, thiserror::Error)]
pub enum ScorerError {
    /// Missing API key.
    #[error("missing API key: BIASCHECK_GROQ_API_KEY not set")]
    MissingApiKey,

    /// Base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// Rate limited by Groq.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Completion envelope missing or unreadable.
    #[error("parse error: {0}")]
    Parse(String),

    /// The completion has no message content.
    #[error("empty completion")]
    EmptyCompletion,
}

impl From<reqwest::Error> for ScorerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ScorerError::Timeout } else { ScorerError::Network(Arc::new(err)) }
    }
}

impl From<ScorerError> for Error {
    fn from(err: ScorerError) -> Self {
        match err {
            ScorerError::Parse(_) | ScorerError::EmptyCompletion => Error::InvalidVerdict(err.to_string()),
            _ => Error::ScoringUnavailable(err.to_string()),
        }
    }
}
