// src/ranking.rs
//! Scoring and ranking of feed items against an interest profile.
//!
//! Matching is plain substring containment on the lower-cased `title + " " + description`,
//! so "rust" also matches "trust". That is the intended behavior, not token matching.

use chrono::{DateTime, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::profile::InterestProfile;
use crate::telemetry::ensure_metrics_described;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub description: String,
    pub link: String,
    pub published: DateTime<Utc>,
    /// Channel title of the feed the item came from.
    pub feed_source: String,
}

impl FeedItem {
    /// Text used for scoring and search: title and description joined by one space.
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleScore {
    pub item: FeedItem,
    pub score: f64,
}

/// Interests prepared once per batch: lower-cased keys in sorted order, so the
/// floating-point sum for an item does not depend on map iteration order.
#[derive(Debug, Clone)]
pub struct InterestMatcher {
    terms: Vec<(String, f64)>,
}

impl InterestMatcher {
    pub fn new(interests: &HashMap<String, f64>) -> Self {
        let mut terms: Vec<(String, f64)> = interests
            .iter()
            .map(|(k, &w)| (k.to_lowercase(), w))
            .collect();
        terms.sort_by(|a, b| a.0.cmp(&b.0));
        Self { terms }
    }

    pub fn score(&self, item: &FeedItem) -> f64 {
        let text = item.text().to_lowercase();
        self.terms
            .iter()
            .filter(|(kw, _)| text.contains(kw.as_str()))
            .map(|(_, w)| *w)
            .sum()
    }
}

/// Sum of the weights of every interest keyword found in the item text.
pub fn score(item: &FeedItem, interests: &HashMap<String, f64>) -> f64 {
    InterestMatcher::new(interests).score(item)
}

/// Unread items with a non-zero score, in input order.
fn scored_unread(items: &[FeedItem], profile: &InterestProfile) -> Vec<ArticleScore> {
    ensure_metrics_described();

    let matcher = InterestMatcher::new(&profile.interests);
    let mut candidates = 0usize;
    let mut out = Vec::new();
    for item in items {
        if profile.is_read(&item.link) {
            continue;
        }
        candidates += 1;
        let score = matcher.score(item);
        if score > 0.0 {
            out.push(ArticleScore {
                item: item.clone(),
                score,
            });
        }
    }

    counter!("rank_candidates_total").increment(candidates as u64);
    counter!("rank_recommended_total").increment(out.len() as u64);
    debug!(
        target: "ranking",
        total = items.len(),
        candidates,
        recommended = out.len(),
        "scored batch"
    );
    out
}

/// Recommendations, highest score first. Equal scores keep input order.
/// Not truncated; see [`paginate`].
pub fn rank(items: &[FeedItem], profile: &InterestProfile) -> Vec<ArticleScore> {
    let mut scored = scored_unread(items, profile);
    // sort_by is stable
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Same filtering as [`rank`], newest first. Equal timestamps keep input order.
pub fn sort_by_date(items: &[FeedItem], profile: &InterestProfile) -> Vec<ArticleScore> {
    let mut scored = scored_unread(items, profile);
    scored.sort_by(|a, b| b.item.published.cmp(&a.item.published));
    scored
}

/// Zero-based page of `items`; empty when out of range.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page_size == 0 {
        return &[];
    }
    let start = page.saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}
