//! cache_get tool implementation.
//!
//! Retrieves the stored analysis for a URL without calling the scorer or
//! touching any quota.

use biascheck_core::{AnalysisRecord, CacheDb, Error, normalize};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// Article URL; it is normalized the same way evaluate_bias does.
    pub url: String,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetOutput {
    /// The stored analysis.
    pub record: AnalysisRecord,
}

/// Implementation of the cache_get tool.
pub async fn get_impl(cache: &CacheDb, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    let normalized = normalize(&params.url)?;
    let record = cache
        .lookup(&normalized.key)
        .await?
        .ok_or_else(|| Error::CacheMiss(normalized.key.clone()))?;

    let output = CacheGetOutput { record };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize analysis: {e}"), None))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
