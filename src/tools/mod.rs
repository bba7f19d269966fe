//! MCP tool implementations.
//!
//! This module contains the news tool handlers:
//! - `get_news`: List the most recent news items
//! - `get_news_item`: Look up one news item by id
//! - `latest_news`: Body of the `news://latest` resource

pub mod news;

pub use news::{
    GetNewsInput, GetNewsItemInput, GetNewsOutput, NewsItemLookup, NewsToolHandler, clamp_limit,
    until_cancelled,
};
