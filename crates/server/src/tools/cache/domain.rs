//! cache_domain tool implementation.
//!
//! Lists the most recent stored analyses for one publisher domain, for
//! reporting. Never calls the scorer or touches quota.

use biascheck_core::{AnalysisRecord, CacheDb, Error};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default number of analyses returned.
const DEFAULT_LIMIT: usize = 20;

/// Upper bound on analyses returned per call.
const MAX_LIMIT: usize = 100;

/// Parameters for the cache_domain tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheDomainParams {
    /// Publisher host, e.g. "news.example.com".
    pub domain: String,

    /// Maximum number of analyses to return (default 20, max 100).
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Output from the cache_domain tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheDomainOutput {
    pub domain: String,
    /// Analyses stored across all domains.
    pub total_analyses: u64,
    /// Newest first.
    pub records: Vec<AnalysisRecord>,
}

/// Implementation of the cache_domain tool.
pub async fn domain_impl(cache: &CacheDb, params: CacheDomainParams) -> Result<CallToolResult, McpError> {
    let domain = params.domain.trim().to_lowercase();
    if domain.is_empty() {
        return Err(Error::InvalidInput("domain must not be empty".into()).into());
    }
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let records = cache.analyses_for_domain(&domain, limit).await?;
    let total_analyses = cache.count_analyses().await?;

    let output = CacheDomainOutput { domain, total_analyses, records };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize analyses: {e}"), None))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use biascheck_core::{TrustLevel, Verdict};

    async fn seeded() -> CacheDb {
        let cache = CacheDb::open_in_memory().await.unwrap();
        for (key, domain) in [
            ("example.com/one", "example.com"),
            ("example.com/two", "example.com"),
            ("other.org/x", "other.org"),
        ] {
            cache
                .store(&AnalysisRecord::new(key, domain, Verdict::new(TrustLevel::Reliable), "llama3-8b-8192"))
                .await
                .unwrap();
        }
        cache
    }

    fn output(result: &CallToolResult) -> CacheDomainOutput {
        let text = &result.content[0].as_text().unwrap().text;
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn test_domain_lists_only_that_domain() {
        let cache = seeded().await;
        let params = CacheDomainParams { domain: " Example.com ".into(), limit: None };

        let result = domain_impl(&cache, params).await.unwrap();
        let out = output(&result);
        assert_eq!(out.domain, "example.com");
        assert_eq!(out.total_analyses, 3);
        assert_eq!(out.records.len(), 2);
        assert!(out.records.iter().all(|r| r.domain == "example.com"));
    }

    #[tokio::test]
    async fn test_domain_limit_applied() {
        let cache = seeded().await;
        let params = CacheDomainParams { domain: "example.com".into(), limit: Some(1) };

        let out = output(&domain_impl(&cache, params).await.unwrap());
        assert_eq!(out.records.len(), 1);
    }

    #[tokio::test]
    async fn test_domain_unknown_is_empty() {
        let cache = seeded().await;
        let params = CacheDomainParams { domain: "nowhere.net".into(), limit: Some(0) };

        let out = output(&domain_impl(&cache, params).await.unwrap());
        assert!(out.records.is_empty());
    }

    #[tokio::test]
    async fn test_domain_empty_rejected() {
        let cache = seeded().await;
        let params = CacheDomainParams { domain: "  ".into(), limit: None };

        let err = domain_impl(&cache, params).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }
}
