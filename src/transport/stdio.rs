//! Stdio transport for the MCP server.
//!
//! This transport uses standard input/output for communication,
//! which is the standard mode for locally launched MCP servers.

use crate::db::{NewsPool, NewsStore};
use crate::error::{NewsError, NewsResult};
use crate::mcp::NewsService;
use crate::transport::{Transport, wait_for_signal};
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;
use tracing::{info, warn};

/// Stdio transport implementation.
///
/// This transport reads JSON-RPC messages from stdin and writes
/// responses to stdout, following the MCP protocol specification.
pub struct StdioTransport {
    store: Arc<dyn NewsStore>,
    pool: Arc<NewsPool>,
}

impl StdioTransport {
    /// Create a new stdio transport.
    ///
    /// # Arguments
    ///
    /// * `store` - Query layer shared by every request
    /// * `pool` - Pool handle closed when the transport stops
    pub fn new(store: Arc<dyn NewsStore>, pool: Arc<NewsPool>) -> Self {
        Self { store, pool }
    }
}

impl Transport for StdioTransport {
    async fn run(&self) -> NewsResult<()> {
        info!("Starting MCP server with stdio transport");

        let service = NewsService::new(self.store.clone());

        let running_service = match service.serve(stdio()).await {
            Ok(running) => running,
            Err(e) => {
                self.pool.shutdown().await;
                return Err(NewsError::internal(format!(
                    "Failed to start stdio transport: {}",
                    e
                )));
            }
        };

        let shutdown_requested = tokio::select! {
            result = running_service.waiting() => {
                match result {
                    Ok(_quit_reason) => {
                        info!("Stdio transport completed normally");
                    }
                    Err(e) => {
                        warn!(error = %e, "Stdio transport error");
                        self.pool.shutdown().await;
                        return Err(NewsError::internal(format!(
                            "Stdio transport error: {}",
                            e
                        )));
                    }
                }
                false
            }
            _ = wait_for_signal() => {
                info!("Shutdown signal received (send again to force exit)");
                true
            }
        };

        if shutdown_requested {
            // Spawn a task to listen for second signal and force exit
            tokio::spawn(async {
                wait_for_signal().await;
                warn!("Received second signal, forcing immediate exit");
                std::process::exit(1);
            });
        }

        self.pool.shutdown().await;

        if shutdown_requested {
            // stdin reads block and cannot be interrupted by select!
            info!("Exiting process");
            std::process::exit(0);
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "stdio"
    }
}
