// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod handle;
pub mod ingest;
pub mod keywords;
pub mod profile;
pub mod ranking;
pub mod search;
pub mod store;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::handle::ProfileHandle;
pub use crate::keywords::extract_keywords;
pub use crate::profile::{InterestProfile, ProfileLimits};
pub use crate::ranking::{rank, score, sort_by_date, ArticleScore, FeedItem};
pub use crate::search::{advanced_search, SearchOptions, SearchResult};
