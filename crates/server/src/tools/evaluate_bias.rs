//! evaluate_bias tool implementation.
//!
//! Runs one article through the evaluation pipeline. Rejections and failures
//! are still returned as an `Evaluation` document, flagged as a tool error.

use biascheck_core::{EvaluateRequest, Evaluator};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Client identity used when the caller does not supply one.
pub const ANONYMOUS_CLIENT: &str = "anonymous";

/// Input parameters for evaluate_bias tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EvaluateBiasParams {
    /// Article text, as scraped from the page.
    pub content: String,

    /// URL the article was published at. Query string and fragment are ignored
    /// when matching earlier analyses.
    pub url: String,

    /// Identity charged for quota, e.g. the end user's IP address.
    /// Defaults to "anonymous".
    #[serde(default)]
    pub client_id: Option<String>,
}

impl From<EvaluateBiasParams> for EvaluateRequest {
    fn from(params: EvaluateBiasParams) -> Self {
        let client_id = params
            .client_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| ANONYMOUS_CLIENT.to_string());

        Self { content: params.content, url: params.url, client_id }
    }
}

/// Implementation of the evaluate_bias tool.
pub async fn evaluate_impl(evaluator: &Evaluator, params: EvaluateBiasParams) -> Result<CallToolResult, McpError> {
    let request = EvaluateRequest::from(params);
    let evaluation = evaluator.evaluate(&request).await;

    let json = serde_json::to_string_pretty(&evaluation)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize evaluation: {e}"), None))?;

    if evaluation.is_success() {
        Ok(CallToolResult::success(vec![Content::text(json)]))
    } else {
        Ok(CallToolResult::error(vec![Content::text(json)]))
    }
}
