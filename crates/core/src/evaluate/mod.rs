//! Per-request evaluation pipeline.
//!
//! ```text
//! validate → hard limit → normalize → cache lookup ─ hit ──────────────→ serve cached
//!                                                  └ miss → soft limit → score → charge → store → serve fresh
//! ```
//!
//! Every failure is converted into an [`Evaluation`] here; callers never see
//! an `Err`. Losing the store race to a concurrent request for the same URL is
//! recovered by re-reading the winner's record.

pub mod response;

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use response::{Evaluation, EvaluationBody, RateLimitHeaders, SCORING_FAILED_MESSAGE};

use crate::Error;
use crate::cache::{AnalysisRecord, CacheDb, normalize};
use crate::ratelimit::{LimitKind, RateLimiter};
use crate::scorer::Scorer;
use crate::verdict::Verdict;

/// One inbound request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EvaluateRequest {
    /// Article text to assess.
    pub content: String,
    /// Where the text was published.
    pub url: String,
    /// Identity charged for quota (e.g., the caller's IP).
    pub client_id: String,
}

/// Composes cache, limiter and scorer.
#[derive(Clone)]
pub struct Evaluator {
    cache: CacheDb,
    limiter: RateLimiter,
    scorer: Arc<dyn Scorer>,
}

impl Evaluator {
    pub fn new(cache: CacheDb, limiter: RateLimiter, scorer: Arc<dyn Scorer>) -> Self {
        Self { cache, limiter, scorer }
    }

    pub fn cache(&self) -> &CacheDb {
        &self.cache
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Run the pipeline for one request.
    pub async fn evaluate(&self, request: &EvaluateRequest) -> Evaluation {
        let evaluation = match self.run(request).await {
            Ok(evaluation) => evaluation,
            Err(err) => self.fail(&request.client_id, err),
        };

        tracing::info!(
            client = %request.client_id,
            url = %request.url,
            status = evaluation.status_code,
            cached = ?evaluation.cached(),
            "evaluation finished"
        );

        evaluation
    }

    async fn run(&self, request: &EvaluateRequest) -> Result<Evaluation, Error> {
        if request.content.trim().is_empty() {
            return Err(Error::InvalidInput("Content is required".into()));
        }
        if request.url.trim().is_empty() {
            return Err(Error::InvalidInput("URL is required".into()));
        }

        let client = request.client_id.as_str();

        if !self.limiter.admit(client).await? {
            return Err(Error::RateLimited(LimitKind::Hard));
        }

        let normalized = normalize(&request.url)?;

        if let Some(record) = self.cache.lookup(&normalized.key).await? {
            tracing::debug!(key = %normalized.key, "analysis cache hit");
            return self.serve(request, record.analysis_result, true).await;
        }

        if self.limiter.soft_limit_exceeded(client).await? {
            return Err(Error::RateLimited(LimitKind::Soft));
        }

        tracing::debug!(key = %normalized.key, "analysis cache miss, scoring");
        let verdict = self.scorer.score(&request.content).await?;

        self.limiter.increment_soft(client).await?;

        let record = AnalysisRecord::new(&normalized.key, &normalized.domain, verdict, self.scorer.model());
        match self.cache.store(&record).await {
            Ok(()) => self.serve(request, record.analysis_result, false).await,
            Err(Error::AlreadyExists(key)) => {
                tracing::debug!(key = %key, "lost store race, serving the stored analysis");
                let stored = self.cache.lookup(&key).await?.ok_or(Error::CacheMiss(key))?;
                self.serve(request, stored.analysis_result, true).await
            }
            Err(err) => Err(err),
        }
    }

    async fn serve(&self, request: &EvaluateRequest, analysis: Verdict, cached: bool) -> Result<Evaluation, Error> {
        let headers = RateLimitHeaders {
            limit: self.limiter.limit(LimitKind::Soft),
            remaining: self.limiter.remaining(&request.client_id).await?,
            reset: self.limiter.reset_epoch(),
            retry_after: None,
            cache_hit: cached,
        };

        Ok(Evaluation::success(analysis, request.content.clone(), request.url.clone(), cached, headers))
    }

    fn fail(&self, client: &str, err: Error) -> Evaluation {
        match err {
            Error::InvalidInput(msg) => Evaluation::error(400, msg),
            Error::InvalidUrl(msg) => Evaluation::error(400, format!("Invalid URL: {msg}")),
            Error::RateLimited(kind) => {
                tracing::warn!(client, limit = %kind, "request rate limited");
                Evaluation::rate_limited(
                    kind,
                    self.limiter.limit(kind),
                    self.limiter.reset_epoch(),
                    self.limiter.seconds_until_reset(),
                )
            }
            err if err.is_scoring_failure() => {
                tracing::error!(client, error = %err, "scoring failed");
                Evaluation::error(500, SCORING_FAILED_MESSAGE)
            }
            err => {
                tracing::error!(client, error = %err, "evaluation failed");
                Evaluation::error(500, "Analysis failed: internal error")
            }
        }
    }
}
