//! MCP tool implementations.
//!
//! This module contains all tools exposed by the biascheck server.

pub mod cache;
pub mod evaluate_bias;
pub mod rate_limit_status;

pub use cache::{CacheDomainParams, CacheGetParams, domain_impl, get_impl};
pub use evaluate_bias::{EvaluateBiasParams, evaluate_impl};
pub use rate_limit_status::{RateLimitStatusParams, status_impl};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use async_trait::async_trait;
    use biascheck_core::{
        CacheDb, Detection, Error, Evaluator, RateLimitConfig, RateLimiter, Scorer, TrustLevel, Verdict,
    };

    /// Scorer returning a canned verdict, or always failing.
    pub struct FixedScorer {
        fail: bool,
    }

    impl FixedScorer {
        pub fn ok() -> Self {
            Self { fail: false }
        }

        pub fn failing() -> Self {
            Self { fail: true }
        }
    }

    #[async_trait]
    impl Scorer for FixedScorer {
        async fn score(&self, _content: &str) -> Result<Verdict, Error> {
            if self.fail {
                return Err(Error::ScoringUnavailable("connection refused".into()));
            }
            Ok(Verdict {
                trust_level: TrustLevel::Questionable,
                authors: vec![],
                detections: vec![Detection {
                    kind: "missing_sources".into(),
                    label: "Vague authority".into(),
                    description: "\"Experts believe\" without naming anyone".into(),
                    severity: 6,
                    example: "Experts believe the plan will fail".into(),
                    extra: Default::default(),
                }],
                extra: Default::default(),
            })
        }

        fn model(&self) -> &str {
            "fixed-model"
        }
    }

    pub async fn evaluator(scorer: FixedScorer) -> Evaluator {
        let cache = CacheDb::open_in_memory().await.unwrap();
        let limiter = RateLimiter::in_memory(RateLimitConfig::default());
        Evaluator::new(cache, limiter, Arc::new(scorer))
    }
}
