// src/ingest/feed_list.rs
//! Plain-text feed list: one URL per line, `#` comments, blank lines ignored.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub const DEFAULT_FEEDS: &[&str] = &[
    "https://lessnews.dev/rss.xml",
    "https://blog.golang.org/feed.atom",
    "https://news.ycombinator.com/rss",
    "https://dev.to/feed",
];

const HEADER: &str = "# RSS Feed URLs (one per line)\n\
                      # Lines starting with # are comments\n\
                      # Example: https://example.com/feed.xml\n\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLine {
    /// 1-based
    pub line: usize,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedList {
    pub urls: Vec<String>,
    pub invalid: Vec<InvalidLine>,
}

pub fn parse_feed_list(content: &str) -> FeedList {
    let mut list = FeedList::default();
    for (i, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if !(line.starts_with("http://") || line.starts_with("https://")) {
            list.invalid.push(InvalidLine {
                line: i + 1,
                value: line.to_string(),
            });
            continue;
        }
        list.urls.push(line.to_string());
    }
    list
}

pub fn load_feed_list(path: &Path) -> Result<FeedList> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading feed list from {}", path.display()))?;
    let list = parse_feed_list(&content);
    for bad in &list.invalid {
        tracing::warn!(
            target: "ingest",
            line = bad.line,
            value = %bad.value,
            "invalid feed url (must start with http:// or https://)"
        );
    }
    Ok(list)
}

/// Heuristic only: `false` means "might not be a feed", worth a warning, not a rejection.
pub fn looks_like_feed_url(url: &str) -> bool {
    const SUFFIXES: &[&str] = &[".xml", ".rss", "/feed", "/rss", ".atom"];
    let u = url.trim_end_matches('/').to_ascii_lowercase();
    SUFFIXES.iter().any(|s| u.ends_with(s)) || u.contains("feed") || u.contains("rss")
}

pub fn render_feed_list<S: AsRef<str>>(urls: &[S]) -> String {
    let mut out = String::from(HEADER);
    for u in urls {
        out.push_str(u.as_ref());
        out.push('\n');
    }
    out
}
