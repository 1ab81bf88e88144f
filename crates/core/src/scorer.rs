//! The external scoring capability.

use async_trait::async_trait;

use crate::Error;
use crate::verdict::Verdict;

/// Something that turns article text into a [`Verdict`].
///
/// Implementations own prompt formatting, input truncation and response
/// parsing. Transport failures map to `Error::ScoringUnavailable`, unusable
/// answers to `Error::InvalidVerdict`.
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn score(&self, content: &str) -> Result<Verdict, Error>;

    /// Model identifier recorded with every stored analysis.
    fn model(&self) -> &str;
}
