//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (BIASCHECK_*)
//! 2. TOML config file (if BIASCHECK_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Which identity the hard daily safeguard counts against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardLimitScope {
    /// One safeguard counter per client identifier.
    #[default]
    PerClient,
    /// A single counter shared by every client.
    Global,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (BIASCHECK_*)
/// 2. TOML config file (if BIASCHECK_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Groq API key used as the scorer's bearer token.
    ///
    /// Set via BIASCHECK_GROQ_API_KEY environment variable.
    /// Required only when a cache miss needs a fresh analysis.
    #[serde(default)]
    pub groq_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible chat completions API.
    ///
    /// Set via BIASCHECK_GROQ_BASE_URL environment variable.
    #[serde(default = "default_groq_base_url")]
    pub groq_base_url: String,

    /// Scoring model identifier, recorded on every stored analysis.
    ///
    /// Set via BIASCHECK_MODEL environment variable.
    #[serde(default = "default_model")]
    pub model: String,

    /// Path to SQLite analysis database.
    ///
    /// Set via BIASCHECK_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for scorer requests.
    ///
    /// Set via BIASCHECK_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Scorer request timeout in milliseconds.
    ///
    /// Set via BIASCHECK_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Per-client daily cap on fresh (non-cached) analyses.
    ///
    /// Set via BIASCHECK_SOFT_DAILY_LIMIT environment variable.
    #[serde(default = "default_soft_daily_limit")]
    pub soft_daily_limit: u32,

    /// Daily cap on incoming requests, cached or not.
    ///
    /// Set via BIASCHECK_HARD_DAILY_LIMIT environment variable.
    #[serde(default = "default_hard_daily_limit")]
    pub hard_daily_limit: u32,

    /// Whether the hard cap is counted per client or globally.
    ///
    /// Set via BIASCHECK_HARD_LIMIT_SCOPE environment variable (`per_client` or `global`).
    #[serde(default)]
    pub hard_limit_scope: HardLimitScope,

    /// UTC offset in minutes of the time zone whose midnight resets the counters.
    ///
    /// Set via BIASCHECK_RESET_UTC_OFFSET_MINUTES environment variable.
    #[serde(default)]
    pub reset_utc_offset_minutes: i32,
}

fn default_groq_base_url() -> String {
    "https://api.groq.com/openai/v1".into()
}

fn default_model() -> String {
    "llama3-8b-8192".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./biascheck.sqlite")
}

fn default_user_agent() -> String {
    "biascheck/0.1".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_soft_daily_limit() -> u32 {
    50
}

fn default_hard_daily_limit() -> u32 {
    200
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            groq_base_url: default_groq_base_url(),
            model: default_model(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            soft_daily_limit: default_soft_daily_limit(),
            hard_daily_limit: default_hard_daily_limit(),
            hard_limit_scope: HardLimitScope::PerClient,
            reset_utc_offset_minutes: 0,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Reference time zone for daily counter resets.
    ///
    /// Falls back to UTC when the offset is out of range; `validate` rejects
    /// such values before they get here.
    pub fn reset_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.reset_utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `BIASCHECK_`
    /// 2. TOML file from `BIASCHECK_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("BIASCHECK_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("BIASCHECK_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the Groq API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the Groq API key is not set.
    pub fn require_groq_api_key(&self) -> Result<&str, ConfigError> {
        self.groq_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "groq_api_key".into(),
                hint: "Set BIASCHECK_GROQ_API_KEY environment variable".into(),
            })
    }
}
