//! SQLite-backed result cache for bias analyses.
//!
//! One immutable record per canonical URL, accessed asynchronously through
//! tokio-rusqlite. No eviction or TTL: records live until a model change
//! invalidates them out of band.

pub mod analyses;
pub mod connection;
pub mod key;
pub mod migrations;

pub use crate::Error;

pub use analyses::AnalysisRecord;
pub use connection::CacheDb;
pub use key::{NormalizedUrl, normalize};
