//! Database access layer.
//!
//! This module provides database access functionality:
//! - Connection pool ownership (lazy creation, explicit shutdown)
//! - The two read-only news queries

pub mod news;
pub mod pool;

pub use news::{NewsRepository, NewsStore};
pub use pool::{NewsPool, PgPoolFactory, PoolFactory, PoolHandle, PoolSettings};
