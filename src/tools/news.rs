//! News tool handlers.
//!
//! This module implements the `get_news` and `get_news_item` MCP tools and the body
//! of the `news://latest` resource. Inputs are clamped here rather than rejected.

use crate::db::NewsStore;
use crate::error::{NewsError, NewsResult};
use crate::models::NewsItem;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_NEWS_LIMIT: i64 = 10;
pub const MIN_NEWS_LIMIT: i64 = 1;
pub const MAX_NEWS_LIMIT: i64 = 100;
pub const LATEST_NEWS_COUNT: u32 = 5;

fn default_limit() -> i64 {
    DEFAULT_NEWS_LIMIT
}

/// Input for the get_news tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetNewsInput {
    /// Maximum number of news items to return. Default: 10, range 1-100 (out-of-range values are clamped)
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Default for GetNewsInput {
    fn default() -> Self {
        Self {
            limit: DEFAULT_NEWS_LIMIT,
        }
    }
}

/// Output from the get_news tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct GetNewsOutput {
    /// News items, newest first
    pub items: Vec<NewsItem>,
    /// Number of items returned
    pub count: usize,
}

impl From<Vec<NewsItem>> for GetNewsOutput {
    fn from(items: Vec<NewsItem>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }
}

/// Input for the get_news_item tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetNewsItemInput {
    /// Integer primary-key ID of the news item
    pub news_id: i64,
}

/// Result of a single-item lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsItemLookup {
    Found(NewsItem),
    /// Human-readable explanation returned to the agent instead of an error.
    NotFound(String),
}

impl NewsItemLookup {
    pub fn not_found(news_id: i64) -> Self {
        Self::NotFound(format!("No news item found with id={}", news_id))
    }
}

/// Clamp a requested limit into `[MIN_NEWS_LIMIT, MAX_NEWS_LIMIT]`.
pub fn clamp_limit(requested: i64) -> u32 {
    // Bounds fit in u32, so the cast cannot truncate.
    requested.clamp(MIN_NEWS_LIMIT, MAX_NEWS_LIMIT) as u32
}

/// Run `work` until it finishes or `cancelled` resolves, whichever comes first.
///
/// When cancellation wins, `work` is dropped before returning, so a query in flight
/// stops and its connection goes back to the pool. Cancellation is checked first,
/// so an already-cancelled request never reaches the store.
pub async fn until_cancelled<T>(
    operation: &str,
    cancelled: impl Future<Output = ()>,
    work: impl Future<Output = NewsResult<T>>,
) -> NewsResult<T> {
    tokio::select! {
        biased;
        _ = cancelled => {
            info!(operation, "Request cancelled by client");
            Err(NewsError::cancelled(operation))
        }
        result = work => result,
    }
}

/// Handler for the news tools and resource.
#[derive(Clone)]
pub struct NewsToolHandler {
    store: Arc<dyn NewsStore>,
}

impl NewsToolHandler {
    /// Create a new news tool handler over the given store.
    pub fn new(store: Arc<dyn NewsStore>) -> Self {
        Self { store }
    }

    /// Handle the get_news tool call.
    pub async fn get_news(&self, input: GetNewsInput) -> NewsResult<GetNewsOutput> {
        let limit = clamp_limit(input.limit);
        let items = self.store.list_recent(limit).await?;

        info!(
            requested_limit = input.limit,
            limit,
            row_count = items.len(),
            "News listed"
        );

        Ok(items.into())
    }

    /// Handle the get_news_item tool call.
    pub async fn get_news_item(&self, input: GetNewsItemInput) -> NewsResult<NewsItemLookup> {
        let item = self.store.get_by_id(input.news_id).await?;

        info!(news_id = input.news_id, found = item.is_some(), "News item lookup");

        Ok(match item {
            Some(item) => NewsItemLookup::Found(item),
            None => NewsItemLookup::not_found(input.news_id),
        })
    }

    /// Body of the `news://latest` resource.
    pub async fn latest_news(&self) -> NewsResult<Vec<NewsItem>> {
        self.store.list_recent(LATEST_NEWS_COUNT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct SetOnDrop(Arc<AtomicBool>);

    impl Drop for SetOnDrop {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_clamp_limit_bounds() {
        assert_eq!(clamp_limit(200), 100);
        assert_eq!(clamp_limit(101), 100);
        assert_eq!(clamp_limit(i64::MAX), 100);
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(-5), 1);
        assert_eq!(clamp_limit(i64::MIN), 1);
    }

    #[test]
    fn test_clamp_limit_in_range_unchanged() {
        for limit in 1..=100 {
            assert_eq!(clamp_limit(limit), limit as u32);
        }
    }

    #[test]
    fn test_get_news_input_default_limit() {
        let input: GetNewsInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input.limit, DEFAULT_NEWS_LIMIT);

        let input: GetNewsInput = serde_json::from_str(r#"{"limit": 5}"#).unwrap();
        assert_eq!(input.limit, 5);
    }

    #[test]
    fn test_get_news_item_input_requires_id() {
        assert!(serde_json::from_str::<GetNewsItemInput>("{}").is_err());
        let input: GetNewsItemInput = serde_json::from_str(r#"{"news_id": 7}"#).unwrap();
        assert_eq!(input.news_id, 7);
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            NewsItemLookup::not_found(999),
            NewsItemLookup::NotFound("No news item found with id=999".to_string())
        );
    }

    #[test]
    fn test_get_news_output_serialization() {
        let output = GetNewsOutput::from(Vec::new());
        let json = serde_json::to_string(&output).unwrap();
        assert_eq!(json, r#"{"items":[],"count":0}"#);
    }

    #[tokio::test]
    async fn test_until_cancelled_returns_work_result() {
        let result = until_cancelled("get_news", std::future::pending(), async { Ok(3) }).await;
        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_until_cancelled_skips_work_when_already_cancelled() {
        let result = until_cancelled("get_news", async {}, async { Ok(3) }).await;
        assert!(matches!(result, Err(NewsError::Cancelled { .. })));
    }

    #[tokio::test]
    async fn test_until_cancelled_drops_pending_work() {
        let dropped = Arc::new(AtomicBool::new(false));
        let guard = SetOnDrop(dropped.clone());
        let work = async move {
            let _guard = guard;
            std::future::pending::<()>().await;
            Ok(())
        };

        let err = until_cancelled("get_news", async {}, work)
            .await
            .unwrap_err();

        assert!(matches!(err, NewsError::Cancelled { .. }));
        assert!(dropped.load(Ordering::SeqCst));
    }
}
