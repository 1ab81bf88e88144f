//! rate_limit_status tool implementation.
//!
//! Reports the caller's remaining fresh-analysis quota without consuming any.

use biascheck_core::{LimitKind, RateLimiter};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::evaluate_bias::ANONYMOUS_CLIENT;

/// Input parameters for rate_limit_status tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct RateLimitStatusParams {
    /// Identity to report on. Defaults to "anonymous".
    #[serde(default)]
    pub client_id: Option<String>,
}

/// Output structure for rate_limit_status tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RateLimitStatusOutput {
    /// Daily cap on fresh analyses.
    pub limit: u32,
    /// Fresh analyses left today.
    pub remaining: u32,
    /// Unix time of the next reset.
    pub reset: i64,
    /// Seconds until the next reset.
    pub retry_after_seconds: i64,
}

/// Implementation of the rate_limit_status tool.
pub async fn status_impl(limiter: &RateLimiter, params: RateLimitStatusParams) -> Result<CallToolResult, McpError> {
    let client = params
        .client_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(ANONYMOUS_CLIENT);

    let output = RateLimitStatusOutput {
        limit: limiter.limit(LimitKind::Soft),
        remaining: limiter.remaining(client).await?,
        reset: limiter.reset_epoch(),
        retry_after_seconds: limiter.seconds_until_reset(),
    };

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize status: {e}"), None))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
