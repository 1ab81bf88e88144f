//! Unified error types for biascheck.
//!
//! Display strings carry a stable code prefix so log lines and MCP errors can
//! be matched without parsing free text.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

use crate::ratelimit::LimitKind;

/// Unified error types for the biascheck service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or empty request fields (e.g., blank content).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// URL could not be parsed or has no host.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// A soft or hard daily quota has been used up.
    #[error("RATE_LIMITED: {0} daily limit exceeded")]
    RateLimited(LimitKind),

    /// The external scorer could not be reached, timed out, or refused the call.
    #[error("SCORING_UNAVAILABLE: {0}")]
    ScoringUnavailable(String),

    /// The scorer answered, but the payload is not a usable verdict.
    #[error("INVALID_VERDICT: {0}")]
    InvalidVerdict(String),

    /// A record for this canonical key was written first by another request.
    #[error("ALREADY_EXISTS: {0}")]
    AlreadyExists(String),

    /// No analysis stored for the given key.
    #[error("CACHE_MISS: {0}")]
    CacheMiss(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),
}

impl Error {
    /// Whether the error is the caller's fault (400-equivalent).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidInput(_) | Error::InvalidUrl(_))
    }

    /// Whether the error came from the scorer, either transport or payload.
    pub fn is_scoring_failure(&self) -> bool {
        matches!(self, Error::ScoringUnavailable(_) | Error::InvalidVerdict(_))
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::InvalidUrl(msg) => (-32003, msg.clone()),
            Error::RateLimited(_) => (-32010, err.to_string()),
            Error::ScoringUnavailable(_) | Error::InvalidVerdict(_) => (-32000, "Analysis failed".to_string()),
            Error::AlreadyExists(msg) => (-32002, msg.clone()),
            Error::CacheMiss(msg) => (-32001, msg.clone()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::CacheMiss("example.com/a".to_string());
        assert!(err.to_string().contains("CACHE_MISS"));
        assert!(err.to_string().contains("example.com/a"));
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::CacheMiss("example.com/a".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32001);
    }

    #[test]
    fn test_scoring_failures_share_message() {
        let unavailable: McpError = Error::ScoringUnavailable("status 503".into()).into();
        let invalid: McpError = Error::InvalidVerdict("missing trust_level".into()).into();
        assert_eq!(unavailable.code.0, invalid.code.0);
        assert_eq!(unavailable.message, invalid.message);
        assert!(!unavailable.message.contains("503"));
    }

    #[test]
    fn test_rate_limited_display() {
        let err = Error::RateLimited(LimitKind::Soft);
        assert_eq!(err.to_string(), "RATE_LIMITED: soft daily limit exceeded");
        let mcp_err: McpError = Error::RateLimited(LimitKind::Hard).into();
        assert_eq!(mcp_err.code.0, -32010);
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::InvalidUrl("x".into()).is_client_error());
        assert!(Error::InvalidInput("x".into()).is_client_error());
        assert!(!Error::ScoringUnavailable("x".into()).is_client_error());
        assert!(Error::InvalidVerdict("x".into()).is_scoring_failure());
        assert!(!Error::AlreadyExists("x".into()).is_scoring_failure());
    }
}
