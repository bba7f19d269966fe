//! Error types for the News MCP Server.
//!
//! This module defines all error types using `thiserror` for ergonomic error handling.
//! Connectivity and query failures are never retried here; they travel up to the
//! protocol boundary where they become MCP error responses. A point lookup that
//! matches no row is not an error and has no variant.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Query failed: {message}")]
    Query {
        message: String,
        /// e.g., "42P01" for undefined table
        sql_state: Option<String>,
        suggestion: String,
    },

    #[error("Timeout: {operation}{}", exceeded(.elapsed_secs))]
    Timeout {
        operation: String,
        /// `None` when the limit that fired is not known at this point
        elapsed_secs: Option<u64>,
    },

    #[error("Cancelled: {operation}")]
    Cancelled { operation: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl NewsError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a query error with optional SQL state.
    pub fn query(
        message: impl Into<String>,
        sql_state: Option<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Query {
            message: message.into(),
            sql_state,
            suggestion: suggestion.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(operation: impl Into<String>, elapsed_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs: Some(elapsed_secs),
        }
    }

    /// Create an error for work abandoned because the client cancelled the request.
    pub fn cancelled(operation: impl Into<String>) -> Self {
        Self::Cancelled {
            operation: operation.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            Self::Query { suggestion, .. } => Some(suggestion),
            Self::Timeout { .. } => {
                Some("Check database load or raise the acquire/query timeout settings")
            }
            _ => None,
        }
    }

    /// Whether the failure comes from the database being unreachable rather than
    /// from the statement itself.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout { .. })
    }
}

/// Convert sqlx errors to NewsError.
impl From<sqlx::Error> for NewsError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => NewsError::configuration(msg.to_string()),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                NewsError::query(
                    db_err.message(),
                    code,
                    "Check that the news table exists with columns id, title, body, published_at",
                )
            }
            sqlx::Error::RowNotFound => NewsError::query(
                "No rows returned",
                None,
                "Verify the query conditions match existing data",
            ),
            // The configured acquire timeout is not known here; see NewsRepository.
            sqlx::Error::PoolTimedOut => NewsError::Timeout {
                operation: "connection pool acquire".to_string(),
                elapsed_secs: None,
            },
            sqlx::Error::PoolClosed => {
                NewsError::connection("Connection pool is closed", "Restart the server")
            }
            sqlx::Error::Io(io_err) => NewsError::connection(
                format!("I/O error: {}", io_err),
                "Check network connectivity and database server status",
            ),
            sqlx::Error::Tls(tls_err) => NewsError::connection(
                format!("TLS error: {}", tls_err),
                "Verify TLS configuration and certificates",
            ),
            sqlx::Error::Protocol(msg) => NewsError::connection(
                format!("Protocol error: {}", msg),
                "Check database server compatibility",
            ),
            sqlx::Error::ColumnNotFound(col) => NewsError::query(
                format!("Column not found: {}", col),
                None,
                "Check the news table schema",
            ),
            sqlx::Error::ColumnDecode { index, source } => NewsError::query(
                format!("Failed to decode column {}: {}", index, source),
                None,
                "Check the news table column types",
            ),
            sqlx::Error::Decode(source) => NewsError::query(
                format!("Decode error: {}", source),
                None,
                "Check the news table column types",
            ),
            sqlx::Error::WorkerCrashed => NewsError::internal("Database worker crashed"),
            _ => NewsError::internal(format!("Unknown database error: {}", err)),
        }
    }
}

fn exceeded(elapsed_secs: &Option<u64>) -> String {
    elapsed_secs
        .map(|secs| format!(" exceeded {}s", secs))
        .unwrap_or_default()
}

/// Result type alias for news operations.
pub type NewsResult<T> = Result<T, NewsError>;

/// Build suggestion data as JSON value.
fn suggestion_data(suggestion: Option<&str>) -> Option<serde_json::Value> {
    suggestion.map(|s| serde_json::json!({ "suggestion": s }))
}

/// Convert NewsError to MCP ErrorData.
///
/// Every variant surfaces as a generic operation failure; the suggestion travels
/// in the `data` object when available.
impl From<NewsError> for rmcp::ErrorData {
    fn from(err: NewsError) -> Self {
        match &err {
            NewsError::Query {
                message,
                sql_state: Some(code),
                suggestion,
            } => rmcp::ErrorData::internal_error(
                format!("Query failed: {} (SQLSTATE: {})", message, code),
                suggestion_data(Some(suggestion)),
            ),
            _ => rmcp::ErrorData::internal_error(err.to_string(), suggestion_data(err.suggestion())),
        }
    }
}
