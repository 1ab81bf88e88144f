//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent`, `model` or `groq_base_url` is empty
    /// - either daily limit is 0
    /// - `reset_utc_offset_minutes` is outside ±14 hours
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }
        if self.model.is_empty() {
            return Err(ConfigError::Invalid { field: "model".into(), reason: "must not be empty".into() });
        }
        if self.groq_base_url.is_empty() {
            return Err(ConfigError::Invalid { field: "groq_base_url".into(), reason: "must not be empty".into() });
        }

        if self.soft_daily_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "soft_daily_limit".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.hard_daily_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "hard_daily_limit".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if !(-840..=840).contains(&self.reset_utc_offset_minutes) {
            return Err(ConfigError::Invalid {
                field: "reset_utc_offset_minutes".into(),
                reason: "must be within ±14 hours (±840 minutes)".into(),
            });
        }

        if self.hard_daily_limit < self.soft_daily_limit {
            tracing::warn!(
                soft_daily_limit = self.soft_daily_limit,
                hard_daily_limit = self.hard_daily_limit,
                "hard_daily_limit is below soft_daily_limit; \
                 the soft quota can never be reached"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = AppConfig { timeout_ms: 301_000, ..Default::default() }; // 5min 1sec
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_empty_model() {
        let config = AppConfig { model: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "model"));
    }

    #[test]
    fn test_validate_zero_limits() {
        let config = AppConfig { soft_daily_limit: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "soft_daily_limit"));

        let config = AppConfig { hard_daily_limit: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "hard_daily_limit"));
    }

    #[test]
    fn test_validate_reset_offset_range() {
        let config = AppConfig { reset_utc_offset_minutes: 841, ..Default::default() };
        assert!(
            matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "reset_utc_offset_minutes")
        );

        let config = AppConfig { reset_utc_offset_minutes: -840, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_hard_below_soft_is_allowed() {
        let config = AppConfig { soft_daily_limit: 50, hard_daily_limit: 10, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig { timeout_ms: 100, soft_daily_limit: 1, hard_daily_limit: 1, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
