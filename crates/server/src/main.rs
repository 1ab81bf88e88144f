//! biascheck server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use biascheck_client::{GroqClient, GroqConfig};
use biascheck_core::{AppConfig, CacheDb, Evaluator, RateLimitConfig, RateLimiter};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;

    if let Err(e) = config.require_groq_api_key() {
        tracing::warn!("{e}; only cached analyses can be served");
    }

    let cache = CacheDb::open(&config.db_path).await?;
    let limiter = RateLimiter::in_memory(RateLimitConfig::from(&config));
    let scorer = GroqClient::new(GroqConfig::from(&config))?;
    let evaluator = Evaluator::new(cache, limiter, Arc::new(scorer));

    tracing::info!(
        db_path = %config.db_path.display(),
        model = %config.model,
        soft_daily_limit = config.soft_daily_limit,
        hard_daily_limit = config.hard_daily_limit,
        "Starting biascheck server on stdio transport"
    );

    let handler = handler::BiasCheckServer::new(evaluator);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
