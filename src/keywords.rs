// src/keywords.rs
//! Keyword extraction: lower-case, whitespace split, short-token and stop-word filter.
//!
//! Duplicates are preserved in order, so callers that weigh by frequency
//! (the profile update) can simply iterate.

/// Tokens at or below this many characters are dropped.
pub const MIN_KEYWORD_CHARS: usize = 3;

/// Fixed stop-word set. Short entries are already removed by the length rule
/// but stay listed so the set reads as a whole.
pub const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "that", "with", "this", "from", "your", "have", "are",
];

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Extract candidate keywords from free text.
pub fn extract_keywords(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|w| w.chars().count() > MIN_KEYWORD_CHARS && !is_stop_word(w))
        .map(str::to_string)
        .collect()
}
