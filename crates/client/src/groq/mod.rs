//! Groq chat completions scorer.
//!
//! Sends one article to an OpenAI-compatible chat completions endpoint and
//! turns the model's JSON answer into a [`Verdict`].
//!
//! ### Behavior
//!
//! - **Endpoint**: `{base_url}/chat/completions`
//! - **Authentication**: `Authorization: Bearer <key>`. The key is checked per
//!   call so a server without one can still serve cached analyses.
//! - **Input**: the article is cut to its first 500 whitespace tokens.
//! - **Failures**: transport errors, timeouts and non-2xx statuses become
//!   `Error::ScoringUnavailable`; an unusable answer becomes
//!   `Error::InvalidVerdict`. No retries.

pub mod error;
pub mod prompt;
pub mod request;
pub mod response;

pub use error::ScorerError;
pub use request::ChatRequest;
pub use response::ChatResponse;

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use biascheck_core::{AppConfig, Error, Scorer, Verdict};
use reqwest::header;

/// Default base URL for the Groq OpenAI-compatible API.
const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default model.
const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "biascheck/0.1";

/// Groq client configuration.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// Bearer token; scoring fails without it.
    pub api_key: Option<String>,
    /// Base URL (default: https://api.groq.com/openai/v1).
    pub base_url: String,
    /// Model identifier, also recorded on stored analyses.
    pub model: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: biascheck/0.x).
    pub user_agent: String,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for GroqConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_key: config.require_groq_api_key().ok().map(str::to_string),
            base_url: config.groq_base_url.clone(),
            model: config.model.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Groq chat completions client.
#[derive(Debug, Clone)]
pub struct GroqClient {
    http: reqwest::Client,
    config: GroqConfig,
    endpoint: String,
}

impl GroqClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GroqConfig) -> Result<Self, ScorerError> {
        let base = config.base_url.trim_end_matches('/');
        url::Url::parse(base).map_err(|e| ScorerError::InvalidBaseUrl(format!("{base}: {e}")))?;
        let endpoint = format!("{base}/chat/completions");

        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| ScorerError::Network(Arc::new(e)))?;

        Ok(Self { http, config, endpoint })
    }

    pub fn config(&self) -> &GroqConfig {
        &self.config
    }

    /// Send one article and return the model's raw JSON answer.
    pub async fn complete(&self, content: &str) -> Result<String, ScorerError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(ScorerError::MissingApiKey)?;

        let start = Instant::now();
        let body = ChatRequest::for_article(&self.config.model, content);

        let http_response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!(status = status.as_u16(), elapsed = ?start.elapsed(), "groq response received");

        if status == 401 || status == 403 {
            return Err(ScorerError::AuthError);
        }

        if status == 429 {
            return Err(ScorerError::RateLimited);
        }

        if !status.is_success() {
            let detail = http_response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %detail, "groq API error");
            return Err(ScorerError::HttpError { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await?;
        let completion: ChatResponse =
            serde_json::from_slice(&bytes).map_err(|e| ScorerError::Parse(e.to_string()))?;

        tracing::debug!(
            requested = %self.config.model,
            answered = completion.model.as_deref().unwrap_or("unknown"),
            elapsed = ?start.elapsed(),
            "groq completion parsed"
        );

        completion.into_content()
    }
}

#[async_trait]
impl Scorer for GroqClient {
    async fn score(&self, content: &str) -> Result<Verdict, Error> {
        let raw = self.complete(content).await?;
        Verdict::parse(&raw)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
