//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::{
    CacheDomainParams, CacheGetParams, EvaluateBiasParams, RateLimitStatusParams, domain_impl, evaluate_impl, get_impl,
    status_impl,
};

use biascheck_core::Evaluator;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for biascheck.
#[derive(Clone)]
pub struct BiasCheckServer {
    evaluator: Evaluator,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl BiasCheckServer {
    /// Create a new server handler around a ready evaluator.
    pub fn new(evaluator: Evaluator) -> Self {
        Self { evaluator, tool_router: Self::tool_router() }
    }

    /// Assess an article for bias and manipulation.
    ///
    /// Serves a stored analysis when the URL has been seen before; otherwise
    /// asks the scorer, subject to daily quotas.
    #[tool(
        description = "Assess article text for bias and manipulation techniques. Returns trust level, authors and up to 3 detections, with quota metadata. Results are cached per URL."
    )]
    async fn evaluate_bias(&self, params: Parameters<EvaluateBiasParams>) -> Result<CallToolResult, McpError> {
        evaluate_impl(&self.evaluator, params.0).await
    }

    /// Read a stored analysis by URL.
    #[tool(description = "Get the stored bias analysis for a URL, if one exists. Never calls the scorer.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(self.evaluator.cache(), params.0).await
    }

    /// List recent analyses for a publisher domain.
    #[tool(
        description = "List the most recent stored bias analyses for a publisher domain, newest first, with the total number of stored analyses."
    )]
    async fn cache_domain(&self, params: Parameters<CacheDomainParams>) -> Result<CallToolResult, McpError> {
        domain_impl(self.evaluator.cache(), params.0).await
    }

    /// Report remaining daily quota.
    #[tool(description = "Report the daily fresh-analysis quota for a client: limit, remaining and reset time.")]
    async fn rate_limit_status(&self, params: Parameters<RateLimitStatusParams>) -> Result<CallToolResult, McpError> {
        status_impl(self.evaluator.limiter(), params.0).await
    }
}

impl ServerHandler for BiasCheckServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "biascheck".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Call evaluate_bias with the article text and its URL. Pass the end user's identity as client_id so quotas apply per user."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
