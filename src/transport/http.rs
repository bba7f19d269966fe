//! HTTP transport with Streamable HTTP support for the MCP server.
//!
//! This transport uses HTTP with SSE streaming responses,
//! which is suitable for networked MCP integrations.

use crate::db::{NewsStore, PgPoolFactory, PoolFactory, PoolHandle};
use crate::error::{NewsError, NewsResult};
use crate::mcp::NewsService;
use crate::transport::{Transport, wait_for_signal};
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// SSE connections may keep the server alive indefinitely after a shutdown signal.
const GRACEFUL_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP transport implementation with Streamable HTTP support.
pub struct HttpTransport<F: PoolFactory = PgPoolFactory> {
    store: Arc<dyn NewsStore>,
    pool: Arc<PoolHandle<F>>,
    host: String,
    port: u16,
    /// MCP endpoint path
    endpoint: String,
}

impl<F: PoolFactory> HttpTransport<F> {
    /// Create a new HTTP transport.
    ///
    /// # Arguments
    ///
    /// * `store` - Query layer shared by every session
    /// * `pool` - Pool handle closed when the transport stops
    /// * `host` - Host address to bind to
    /// * `port` - Port to bind to
    /// * `endpoint` - MCP endpoint path (e.g., "/mcp")
    pub fn new(
        store: Arc<dyn NewsStore>,
        pool: Arc<PoolHandle<F>>,
        host: impl Into<String>,
        port: u16,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            store,
            pool,
            host: host.into(),
            port,
            endpoint: endpoint.into(),
        }
    }

    /// Get the bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the MCP endpoint path.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn router(&self) -> axum::Router {
        let store = self.store.clone();

        // Each session gets its own NewsService over the shared store
        let service = StreamableHttpService::new(
            move || Ok(NewsService::new(store.clone())),
            LocalSessionManager::default().into(),
            Default::default(),
        );

        // nest_service doesn't support root path "/", use fallback_service instead
        if self.endpoint == "/" {
            axum::Router::new().fallback_service(service)
        } else {
            axum::Router::new().nest_service(&self.endpoint, service)
        }
    }
}

impl<F: PoolFactory> Transport for HttpTransport<F> {
    async fn run(&self) -> NewsResult<()> {
        let bind_addr = self.bind_addr();
        info!("Starting MCP server with HTTP transport on {}", bind_addr);

        let app = self.router();

        let listener = match TcpListener::bind(&bind_addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!(error = %e, addr = %bind_addr, "Failed to bind HTTP listener");
                self.pool.shutdown().await;
                return Err(NewsError::connection(
                    format!("Failed to bind to {}: {}", bind_addr, e),
                    "Check that the port is available",
                ));
            }
        };

        info!(endpoint = %self.endpoint, "MCP endpoint ready");

        let shutdown_notify = Arc::new(tokio::sync::Notify::new());
        let shutdown_notify_clone = shutdown_notify.clone();

        let shutdown_signal = async move {
            wait_for_signal().await;
            shutdown_notify_clone.notify_one();
        };

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal);

        let mut result = Ok(());
        tokio::select! {
            served = server => {
                match served {
                    Ok(()) => info!("HTTP server stopped"),
                    Err(e) => {
                        error!(error = %e, "HTTP server error");
                        result = Err(NewsError::internal(format!("HTTP server error: {}", e)));
                    }
                }
            }
            _ = async {
                shutdown_notify.notified().await;
                info!(
                    timeout_secs = GRACEFUL_TIMEOUT.as_secs(),
                    "Waiting for connections to close (send signal again to force exit)..."
                );

                tokio::select! {
                    _ = tokio::time::sleep(GRACEFUL_TIMEOUT) => {
                        warn!("Graceful shutdown timeout, forcing exit");
                    }
                    _ = wait_for_signal() => {
                        warn!("Received second signal, forcing immediate exit");
                    }
                }
            } => {}
        }

        self.pool.shutdown().await;
        result
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
