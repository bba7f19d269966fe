//! News MCP Server - Main entry point.
//!
//! This server provides MCP (Model Context Protocol) tools and resources for AI
//! assistants to read recent news items from PostgreSQL.

use news_mcp_server::config::{Config, TransportMode, redact_url};
use news_mcp_server::db::{NewsPool, NewsRepository, NewsStore, PgPoolFactory};
use news_mcp_server::transport::{HttpTransport, StdioTransport, Transport};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr; stdout belongs to the stdio transport.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from .env, command line and environment
    let config = Config::load();

    init_tracing(&config);

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(e.into());
    }

    info!(
        transport = %config.transport,
        database = %redact_url(&config.database_url),
        "Starting News MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let pool = Arc::new(NewsPool::new(PgPoolFactory::new(config.pool_settings())));
    let store: Arc<dyn NewsStore> = Arc::new(NewsRepository::new(
        pool.clone(),
        config.query_timeout_duration(),
    ));

    if config.lazy_connect {
        info!("Deferring database connection until first request");
    } else {
        pool.acquire().await?;
    }

    let result = match config.transport {
        TransportMode::Stdio => {
            info!("Using stdio transport");
            StdioTransport::new(store, pool).run().await
        }
        TransportMode::Http => {
            info!(
                host = %config.http_host,
                port = config.http_port,
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            HttpTransport::new(
                store,
                pool,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            )
            .run()
            .await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
