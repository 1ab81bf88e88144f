//! Daily request quotas.
//!
//! Two independent counters per calendar day:
//!
//! - **soft**: per client, charged once per successful fresh analysis. Cache
//!   hits neither count toward it nor are blocked by it.
//! - **hard**: per client or global, charged on every incoming request before
//!   any other work. It protects the service, not the scorer budget.
//!
//! Days are calendar days in a fixed UTC offset; counters expire at the next
//! local midnight. A request at exactly midnight belongs to the new day.

pub mod clock;
pub mod store;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{CounterStore, MemoryCounterStore};

use crate::Error;
use crate::config::{AppConfig, HardLimitScope};

/// Quota settings for a [`RateLimiter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub soft_limit: u32,
    pub hard_limit: u32,
    pub hard_scope: HardLimitScope,
    pub offset: FixedOffset,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for RateLimitConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            soft_limit: config.soft_daily_limit,
            hard_limit: config.hard_daily_limit,
            hard_scope: config.hard_limit_scope,
            offset: config.reset_offset(),
        }
    }
}

/// Which quota rejected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    Soft,
    Hard,
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitKind::Soft => f.write_str("soft"),
            LimitKind::Hard => f.write_str("hard"),
        }
    }
}

/// Two-tier daily rate limiter.
///
/// Cheap to clone; clones share the counter store.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
    clock: Arc<dyn Clock>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig, store: Arc<dyn CounterStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock, config }
    }

    /// Limiter backed by an in-process store and the system clock.
    pub fn in_memory(config: RateLimitConfig) -> Self {
        Self::new(config, Arc::new(MemoryCounterStore::new()), Arc::new(SystemClock))
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    pub fn limit(&self, kind: LimitKind) -> u32 {
        match kind {
            LimitKind::Soft => self.config.soft_limit,
            LimitKind::Hard => self.config.hard_limit,
        }
    }

    fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.config.offset).date_naive()
    }

    /// Start of the next local day, in UTC.
    fn period_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = self.today(now);
        let tomorrow = today.succ_opt().unwrap_or(today);
        let local_midnight = tomorrow.and_time(NaiveTime::MIN);
        let utc_midnight = local_midnight - TimeDelta::seconds(i64::from(self.config.offset.local_minus_utc()));
        Utc.from_utc_datetime(&utc_midnight)
    }

    fn soft_key(&self, client: &str, now: DateTime<Utc>) -> String {
        format!("soft:{client}:{}", self.today(now))
    }

    fn hard_key(&self, client: &str, now: DateTime<Utc>) -> String {
        match self.config.hard_scope {
            HardLimitScope::PerClient => format!("hard:client:{client}:{}", self.today(now)),
            HardLimitScope::Global => format!("hard:global:{}", self.today(now)),
        }
    }

    /// Whether the client has used up today's fresh-analysis quota.
    pub async fn soft_limit_exceeded(&self, client: &str) -> Result<bool, Error> {
        let now = self.clock.now();
        let count = self.store.get(&self.soft_key(client, now), now).await?;
        Ok(count >= u64::from(self.config.soft_limit))
    }

    /// Whether today's request safeguard is used up for this client's scope.
    pub async fn hard_limit_exceeded(&self, client: &str) -> Result<bool, Error> {
        let now = self.clock.now();
        let count = self.store.get(&self.hard_key(client, now), now).await?;
        Ok(count >= u64::from(self.config.hard_limit))
    }

    /// Charge one fresh analysis to the client. Returns the new count.
    pub async fn increment_soft(&self, client: &str) -> Result<u64, Error> {
        let now = self.clock.now();
        self.store
            .increment(&self.soft_key(client, now), self.period_end(now), now)
            .await
    }

    /// Charge one incoming request to the safeguard. Returns the new count.
    pub async fn increment_hard(&self, client: &str) -> Result<u64, Error> {
        let now = self.clock.now();
        self.store
            .increment(&self.hard_key(client, now), self.period_end(now), now)
            .await
    }

    /// Count an incoming request against the safeguard and decide whether to
    /// serve it.
    ///
    /// Increment and check are one atomic step, so a burst cannot slip past
    /// the limit between a read and a write. Rejected requests still count.
    pub async fn admit(&self, client: &str) -> Result<bool, Error> {
        let count = self.increment_hard(client).await?;
        let admitted = count <= u64::from(self.config.hard_limit);
        if !admitted {
            tracing::debug!(client, count, limit = self.config.hard_limit, "hard limit reached");
        }
        Ok(admitted)
    }

    /// Fresh analyses the client may still request today.
    pub async fn remaining(&self, client: &str) -> Result<u32, Error> {
        let now = self.clock.now();
        let used = self.store.get(&self.soft_key(client, now), now).await?;
        Ok(u64::from(self.config.soft_limit).saturating_sub(used) as u32)
    }

    /// Seconds until counters reset at the next local midnight.
    pub fn seconds_until_reset(&self) -> i64 {
        let now = self.clock.now();
        (self.period_end(now) - now).num_seconds().max(0)
    }

    /// Unix time of the next reset.
    pub fn reset_epoch(&self) -> i64 {
        self.period_end(self.clock.now()).timestamp()
    }
}
