//! Data models for the News MCP Server.
//!
//! This module re-exports all model types used throughout the application.

pub mod news;

pub use news::NewsItem;
