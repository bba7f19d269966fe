//! Read-only queries over the `news` table.
//!
//! [`NewsStore`] is the seam the tool handlers depend on; [`NewsRepository`] is the
//! PostgreSQL implementation running through the shared [`NewsPool`].

use crate::db::pool::NewsPool;
use crate::error::{NewsError, NewsResult};
use crate::models::NewsItem;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

pub const LIST_RECENT_SQL: &str =
    "SELECT id, title, body, published_at FROM news ORDER BY published_at DESC LIMIT $1";

pub const GET_BY_ID_SQL: &str = "SELECT id, title, body, published_at FROM news WHERE id = $1";

/// Query layer over news items.
#[async_trait]
pub trait NewsStore: Send + Sync {
    /// Up to `limit` items, newest first.
    async fn list_recent(&self, limit: u32) -> NewsResult<Vec<NewsItem>>;

    /// The item with the given id, or `None` when no row matches.
    async fn get_by_id(&self, id: i64) -> NewsResult<Option<NewsItem>>;
}

/// `NewsStore` backed by PostgreSQL.
pub struct NewsRepository {
    pool: Arc<NewsPool>,
    query_timeout: Duration,
}

impl NewsRepository {
    pub fn new(pool: Arc<NewsPool>, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// The pool handle this repository queries through.
    pub fn pool(&self) -> &Arc<NewsPool> {
        &self.pool
    }

    async fn with_timeout<T>(
        &self,
        operation: &str,
        fut: impl Future<Output = Result<T, sqlx::Error>>,
    ) -> NewsResult<T> {
        match timeout(self.query_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(sqlx::Error::PoolTimedOut)) => Err(NewsError::timeout(
                "connection pool acquire",
                self.pool.factory().settings().acquire_timeout.as_secs(),
            )),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(NewsError::timeout(operation, self.query_timeout.as_secs())),
        }
    }
}

#[async_trait]
impl NewsStore for NewsRepository {
    async fn list_recent(&self, limit: u32) -> NewsResult<Vec<NewsItem>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let pool = self.pool.acquire().await?;
        let items = self
            .with_timeout(
                "list recent news",
                sqlx::query_as::<_, NewsItem>(LIST_RECENT_SQL)
                    .bind(i64::from(limit))
                    .fetch_all(&pool),
            )
            .await?;

        debug!(limit, row_count = items.len(), "Listed recent news");
        Ok(items)
    }

    async fn get_by_id(&self, id: i64) -> NewsResult<Option<NewsItem>> {
        // The id column is a PostgreSQL `integer`; anything wider cannot match.
        let Ok(id) = i32::try_from(id) else {
            debug!(news_id = id, "News id outside integer range");
            return Ok(None);
        };

        let pool = self.pool.acquire().await?;
        let item = self
            .with_timeout(
                "fetch news item",
                sqlx::query_as::<_, NewsItem>(GET_BY_ID_SQL)
                    .bind(id)
                    .fetch_optional(&pool),
            )
            .await?;

        debug!(news_id = id, found = item.is_some(), "Fetched news item");
        Ok(item)
    }
}
