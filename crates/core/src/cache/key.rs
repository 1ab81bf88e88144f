//! Canonical cache keys for analysed URLs.
//!
//! The key is `host + path` with one trailing slash removed. Query strings and
//! fragments are dropped, so `https://x.com/a?utm=1` and `https://x.com/a/`
//! share a single analysis.

use crate::Error;

/// A source URL reduced to its cache key and reporting domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    pub key: String,
    pub domain: String,
}

/// Normalize a source URL into its canonical cache key and domain.
///
/// The host is taken as the parser reports it; no extra case folding is done.
pub fn normalize(input: &str) -> Result<NormalizedUrl, Error> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidUrl("empty URL".into()));
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| Error::InvalidUrl(format!("{trimmed}: {e}")))?;

    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| Error::InvalidUrl(format!("{trimmed}: missing host")))?;

    let joined = format!("{host}{}", parsed.path());
    let key = joined.strip_suffix('/').unwrap_or(&joined).to_string();

    Ok(NormalizedUrl { key, domain: host.to_string() })
}
