//! Core types and shared functionality for biascheck.
//!
//! This crate provides:
//! - Analysis cache with SQLite backend, keyed by normalized URL
//! - Two-tier daily rate limiting
//! - The evaluation pipeline and its response shapes
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod ratelimit;
pub mod scorer;
pub mod verdict;

pub use cache::{AnalysisRecord, CacheDb, NormalizedUrl, normalize};
pub use config::AppConfig;
pub use error::Error;
pub use evaluate::{EvaluateRequest, Evaluation, EvaluationBody, Evaluator, RateLimitHeaders};
pub use ratelimit::{LimitKind, RateLimitConfig, RateLimiter};
pub use scorer::Scorer;
pub use verdict::{Detection, TrustLevel, Verdict};
