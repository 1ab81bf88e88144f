//! Response shapes handed back to whatever front end relays an evaluation.
//!
//! The body mirrors the public JSON contract (`status` discriminates success,
//! `rate_limited` and `error`); status code and headers ride alongside so an
//! HTTP adapter can copy them verbatim.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ratelimit::LimitKind;
use crate::verdict::Verdict;

/// Message shown for any scorer failure, whatever the cause.
pub const SCORING_FAILED_MESSAGE: &str = "Analysis failed: the scoring service could not produce a result";

/// Quota metadata, serialized under the HTTP header names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RateLimitHeaders {
    #[serde(rename = "X-RateLimit-Limit")]
    pub limit: u32,
    #[serde(rename = "X-RateLimit-Remaining")]
    pub remaining: u32,
    /// Unix time at which the quota resets.
    #[serde(rename = "X-RateLimit-Reset")]
    pub reset: i64,
    #[serde(rename = "Retry-After", default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<i64>,
    #[serde(rename = "X-Cache-Hit")]
    pub cache_hit: bool,
}

impl RateLimitHeaders {
    /// Header name/value pairs in the order an HTTP response would carry them.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("X-RateLimit-Limit", self.limit.to_string()),
            ("X-RateLimit-Remaining", self.remaining.to_string()),
            ("X-RateLimit-Reset", self.reset.to_string()),
        ];
        if let Some(retry_after) = self.retry_after {
            pairs.push(("Retry-After", retry_after.to_string()));
        }
        pairs.push(("X-Cache-Hit", self.cache_hit.to_string()));
        pairs
    }
}

/// Response body, tagged by `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EvaluationBody {
    Success {
        analysis: Verdict,
        original_content: String,
        source_url: String,
        timestamp: String,
        cached: bool,
    },
    RateLimited {
        error: String,
        message: String,
        retry_after_seconds: i64,
    },
    Error {
        error: String,
        timestamp: String,
    },
}

/// Outcome of one `evaluate_bias` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Evaluation {
    /// HTTP-equivalent status code.
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<RateLimitHeaders>,
    pub body: EvaluationBody,
}

pub(crate) fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

impl Evaluation {
    pub(crate) fn success(
        analysis: Verdict, original_content: String, source_url: String, cached: bool, headers: RateLimitHeaders,
    ) -> Self {
        Self {
            status_code: 200,
            headers: Some(headers),
            body: EvaluationBody::Success { analysis, original_content, source_url, timestamp: timestamp(), cached },
        }
    }

    pub(crate) fn rate_limited(kind: LimitKind, limit: u32, reset: i64, retry_after: i64) -> Self {
        let (error, message) = match kind {
            LimitKind::Soft => (
                "API rate limit exceeded",
                "You have exceeded the daily limit for API calls. Cached results are still available.",
            ),
            LimitKind::Hard => ("Rate limit exceeded", "Too many requests. Please try again later."),
        };

        Self {
            status_code: 429,
            headers: Some(RateLimitHeaders {
                limit,
                remaining: 0,
                reset,
                retry_after: Some(retry_after),
                cache_hit: false,
            }),
            body: EvaluationBody::RateLimited {
                error: error.to_string(),
                message: message.to_string(),
                retry_after_seconds: retry_after,
            },
        }
    }

    pub(crate) fn error(status_code: u16, error: impl Into<String>) -> Self {
        Self { status_code, headers: None, body: EvaluationBody::Error { error: error.into(), timestamp: timestamp() } }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.body, EvaluationBody::Success { .. })
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self.body, EvaluationBody::RateLimited { .. })
    }

    /// Whether the analysis came from the cache; None for failures.
    pub fn cached(&self) -> Option<bool> {
        match &self.body {
            EvaluationBody::Success { cached, .. } => Some(*cached),
            _ => None,
        }
    }

    pub fn analysis(&self) -> Option<&Verdict> {
        match &self.body {
            EvaluationBody::Success { analysis, .. } => Some(analysis),
            _ => None,
        }
    }
}
