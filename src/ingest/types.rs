// src/ingest/types.rs
use anyhow::Result;

use crate::ranking::FeedItem;

/// A source of feed items (one RSS channel, a fixture, ...).
#[async_trait::async_trait]
pub trait FeedProvider: Send + Sync {
    async fn fetch_items(&self) -> Result<Vec<FeedItem>>;
    fn name(&self) -> &str;
}
