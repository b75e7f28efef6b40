// src/search.rs
//! Free-text article search with optional date range and source filters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ranking::FeedItem;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Inclusive lower bound on `published`.
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `published`.
    pub end_date: Option<DateTime<Utc>>,
    /// Case-insensitive feed source name.
    pub source: Option<String>,
}

impl SearchOptions {
    pub fn accepts(&self, item: &FeedItem) -> bool {
        if let Some(start) = self.start_date {
            if item.published < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if item.published > end {
                return false;
            }
        }
        match self.source.as_deref().map(str::trim) {
            Some(src) if !src.is_empty() => item.feed_source.eq_ignore_ascii_case(src),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub item: FeedItem,
    /// Distinct query words found, in query order.
    pub matches: Vec<String>,
    /// Total occurrences of the matched words in the item text.
    pub match_count: usize,
}

/// Search `items` for the whitespace-separated words of `term`.
///
/// Items with more occurrences come first; equal counts keep input order.
/// A blank term returns every item that passes the filters, unranked.
pub fn advanced_search(items: &[FeedItem], term: &str, options: &SearchOptions) -> Vec<SearchResult> {
    let mut words: Vec<String> = Vec::new();
    for w in term.to_lowercase().split_whitespace() {
        if !words.iter().any(|x| x == w) {
            words.push(w.to_string());
        }
    }

    let mut out = Vec::new();
    for item in items.iter().filter(|it| options.accepts(it)) {
        if words.is_empty() {
            out.push(SearchResult {
                item: item.clone(),
                matches: Vec::new(),
                match_count: 0,
            });
            continue;
        }

        let text = item.text().to_lowercase();
        let mut matches = Vec::new();
        let mut match_count = 0usize;
        for w in &words {
            let n = text.matches(w.as_str()).count();
            if n > 0 {
                matches.push(w.clone());
                match_count += n;
            }
        }
        if match_count > 0 {
            out.push(SearchResult {
                item: item.clone(),
                matches,
                match_count,
            });
        }
    }

    out.sort_by(|a, b| b.match_count.cmp(&a.match_count));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(title: &str, source: &str, day: u32) -> FeedItem {
        FeedItem {
            title: title.into(),
            description: String::new(),
            link: format!("https://example.test/{day}"),
            published: Utc.with_ymd_and_hms(2024, 5, day, 8, 0, 0).unwrap(),
            feed_source: source.into(),
        }
    }

    #[test]
    fn counts_occurrences_and_orders_by_count() {
        let items = vec![
            item("Rust weekly", "Blog", 1),
            item("Rust rust and more Rust", "Blog", 2),
            item("Go news", "Blog", 3),
        ];
        let res = advanced_search(&items, "rust", &SearchOptions::default());
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].match_count, 3);
        assert_eq!(res[0].item.title, "Rust rust and more Rust");
        assert_eq!(res[1].matches, vec!["rust".to_string()]);
    }

    #[test]
    fn repeated_query_words_are_deduplicated() {
        let items = vec![item("Tokio tips", "Blog", 1)];
        let res = advanced_search(&items, "tokio TOKIO tips", &SearchOptions::default());
        assert_eq!(res[0].matches, vec!["tokio".to_string(), "tips".into()]);
        assert_eq!(res[0].match_count, 2);
    }

    #[test]
    fn date_range_is_inclusive() {
        let items = vec![
            item("a rust", "Blog", 1),
            item("b rust", "Blog", 2),
            item("c rust", "Blog", 3),
        ];
        let opts = SearchOptions {
            start_date: Some(items[1].published),
            end_date: Some(items[2].published),
            source: None,
        };
        let res = advanced_search(&items, "rust", &opts);
        let titles: Vec<&str> = res.iter().map(|r| r.item.title.as_str()).collect();
        assert_eq!(titles, vec!["b rust", "c rust"]);
    }

    #[test]
    fn source_filter_is_case_insensitive() {
        let items = vec![item("rust", "Hacker News", 1), item("rust", "Dev.to", 2)];
        let opts = SearchOptions {
            source: Some("hacker news".into()),
            ..Default::default()
        };
        let res = advanced_search(&items, "rust", &opts);
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].item.feed_source, "Hacker News");
    }

    #[test]
    fn blank_term_lists_filtered_items() {
        let items = vec![item("one", "A", 1), item("two", "B", 2)];
        let opts = SearchOptions {
            source: Some("B".into()),
            ..Default::default()
        };
        let res = advanced_search(&items, "   ", &opts);
        assert_eq!(res.len(), 1);
        assert!(res[0].matches.is_empty());
        assert_eq!(res[0].match_count, 0);
    }
}
