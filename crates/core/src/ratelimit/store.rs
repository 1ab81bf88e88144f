//! Counter storage for the rate limiter.
//!
//! The limiter only ever needs two primitives: an atomic increment-and-read
//! and a plain read. Anything that can offer those per key (a shared map, a
//! Redis `INCR` + `EXPIREAT`) can back it.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::Error;

/// Expired entries are swept after this many increments.
const SWEEP_EVERY: u64 = 1024;

/// Storage for expiring counters.
#[async_trait]
pub trait CounterStore: Send + Sync + fmt::Debug {
    /// Increment the counter for `key` and return its new value.
    ///
    /// A missing or expired counter starts over at 1 with the given expiry.
    /// The read-modify-write must be atomic per key.
    async fn increment(&self, key: &str, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Result<u64, Error>;

    /// Current value of the counter, 0 if missing or expired.
    async fn get(&self, key: &str, now: DateTime<Utc>) -> Result<u64, Error>;
}

#[derive(Debug, Clone, Copy)]
struct Counter {
    count: u64,
    expires_at: DateTime<Utc>,
}

/// In-process counter store. State is lost on restart.
#[derive(Default)]
pub struct MemoryCounterStore {
    counters: DashMap<String, Counter>,
    ops: AtomicU64,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live and not-yet-swept counters.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Drop every counter that expired at or before `now`.
    pub fn sweep(&self, now: DateTime<Utc>) {
        let before = self.counters.len();
        self.counters.retain(|_, c| c.expires_at > now);
        let swept = before.saturating_sub(self.counters.len());
        if swept > 0 {
            tracing::debug!(swept, "swept expired rate limit counters");
        }
    }
}

impl fmt::Debug for MemoryCounterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCounterStore").field("counters", &self.counters.len()).finish()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn increment(&self, key: &str, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Result<u64, Error> {
        let count = {
            let mut entry = self.counters.entry(key.to_string()).or_insert(Counter { count: 0, expires_at });
            if entry.expires_at <= now {
                *entry = Counter { count: 0, expires_at };
            }
            entry.count += 1;
            entry.count
        };

        if (self.ops.fetch_add(1, Ordering::Relaxed) + 1) % SWEEP_EVERY == 0 {
            self.sweep(now);
        }

        Ok(count)
    }

    async fn get(&self, key: &str, now: DateTime<Utc>) -> Result<u64, Error> {
        Ok(self
            .counters
            .get(key)
            .filter(|c| c.expires_at > now)
            .map(|c| c.count)
            .unwrap_or(0))
    }
}
