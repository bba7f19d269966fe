//! News MCP Server Library
//!
//! This library provides MCP (Model Context Protocol) tools and resources for AI
//! assistants to read recent news items from a PostgreSQL `news` table.

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::NewsError;
pub use mcp::NewsService;
