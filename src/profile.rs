// src/profile.rs
//! # Interest Profile
//!
//! Weighted keyword map plus the set of links the user already marked.
//!
//! Every `update_*` call runs the same pipeline:
//! 1. extract keywords and add `1.0` per occurrence,
//! 2. decay all weights by `decay_factor ^ elapsed_days`,
//! 3. evict weights below `min_weight`,
//! 4. trim to `max_interests` with a single numeric cutoff,
//! 5. advance `last_updated`.
//!
//! Decay runs only on update, never on a timer: an untouched profile keeps its weights.

use chrono::{DateTime, Utc};
use metrics::{counter, gauge};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::keywords::extract_keywords;
use crate::telemetry::ensure_metrics_described;

pub const MAX_INTERESTS: usize = 100;
pub const MIN_WEIGHT: f64 = 0.1;
pub const DECAY_FACTOR: f64 = 0.95;

const MS_PER_DAY: f64 = 24.0 * 3_600_000.0;

/// Tunables for the update pipeline. Defaults are the constants above.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileLimits {
    pub max_interests: usize,
    pub min_weight: f64,
    pub decay_factor: f64,
}

impl Default for ProfileLimits {
    fn default() -> Self {
        Self {
            max_interests: MAX_INTERESTS,
            min_weight: MIN_WEIGHT,
            decay_factor: DECAY_FACTOR,
        }
    }
}

impl ProfileLimits {
    /// Replace out-of-range values with the defaults.
    pub fn sanitized(mut self) -> Self {
        if self.max_interests == 0 {
            self.max_interests = MAX_INTERESTS;
        }
        if !self.min_weight.is_finite() || self.min_weight < 0.0 {
            self.min_weight = MIN_WEIGHT;
        }
        if !(self.decay_factor.is_finite() && self.decay_factor > 0.0 && self.decay_factor <= 1.0)
        {
            self.decay_factor = DECAY_FACTOR;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestProfile {
    /// keyword -> weight; every weight is >= `min_weight`
    #[serde(default)]
    pub interests: HashMap<String, f64>,
    /// links already marked read/interesting
    #[serde(default)]
    pub read_articles: HashSet<String>,
    /// time of the last decay application
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

impl Default for InterestProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl InterestProfile {
    pub fn new() -> Self {
        Self::new_at(Utc::now())
    }

    pub fn new_at(now: DateTime<Utc>) -> Self {
        Self {
            interests: HashMap::new(),
            read_articles: HashSet::new(),
            last_updated: now,
        }
    }

    /// Feed text the user marked interesting into the profile, using the wall clock.
    pub fn update(&mut self, text: &str) {
        self.update_at(text, Utc::now());
    }

    /// Same as [`update`](Self::update) with an explicit clock.
    pub fn update_at(&mut self, text: &str, now: DateTime<Utc>) {
        self.update_with_limits(text, now, &ProfileLimits::default());
    }

    pub fn update_with_limits(&mut self, text: &str, now: DateTime<Utc>, limits: &ProfileLimits) {
        ensure_metrics_described();

        let keywords = extract_keywords(text);
        for kw in &keywords {
            *self.interests.entry(kw.clone()).or_insert(0.0) += 1.0;
        }

        let multiplier = decay_multiplier(self.last_updated, now, limits.decay_factor);
        let before = self.interests.len();
        self.interests.retain(|_, w| {
            *w *= multiplier;
            *w >= limits.min_weight
        });
        let decayed_out = before - self.interests.len();

        let trimmed = trim_to_capacity(&mut self.interests, limits.max_interests);

        // Never move backwards, even if the caller's clock does.
        if now > self.last_updated {
            self.last_updated = now;
        }

        counter!("profile_updates_total").increment(1);
        counter!("profile_evicted_total").increment((decayed_out + trimmed) as u64);
        gauge!("profile_interests").set(self.interests.len() as f64);

        debug!(
            target: "profile",
            keywords = keywords.len(),
            multiplier,
            decayed_out,
            trimmed,
            interests = self.interests.len(),
            "profile updated"
        );
    }

    /// Idempotent.
    pub fn mark_read(&mut self, link: &str) {
        if !self.read_articles.contains(link) {
            self.read_articles.insert(link.to_string());
        }
    }

    pub fn is_read(&self, link: &str) -> bool {
        self.read_articles.contains(link)
    }

    pub fn weight(&self, keyword: &str) -> Option<f64> {
        self.interests.get(keyword).copied()
    }

    /// Interests for listing: heaviest first, ties by keyword.
    pub fn interests_by_weight(&self) -> Vec<(String, f64)> {
        let mut out: Vec<(String, f64)> = self
            .interests
            .iter()
            .map(|(k, &w)| (k.clone(), w))
            .collect();
        out.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        out
    }

    /// Re-establish the weight invariants on a value coming from outside
    /// (e.g. a hand-edited profile file). Does not decay or touch `last_updated`.
    pub fn sanitize(&mut self, limits: &ProfileLimits) -> usize {
        let before = self.interests.len();
        self.interests
            .retain(|k, w| !k.is_empty() && w.is_finite() && *w >= limits.min_weight);
        let dropped = before - self.interests.len();
        dropped + trim_to_capacity(&mut self.interests, limits.max_interests)
    }
}

/// `decay_factor ^ (elapsed_hours / 24)`; `1.0` when no time passed or the clock went back.
pub fn decay_multiplier(last: DateTime<Utc>, now: DateTime<Utc>, decay_factor: f64) -> f64 {
    let elapsed_ms = now.signed_duration_since(last).num_milliseconds();
    if elapsed_ms <= 0 {
        return 1.0;
    }
    decay_factor.powf(elapsed_ms as f64 / MS_PER_DAY)
}

/// Trim `interests` to at most `cap` entries using one numeric cutoff.
///
/// The cutoff is the weight at index `len - cap` of the ascending weights; anything
/// strictly below goes. If equal weights straddle that index the whole tied group goes
/// too, so the result may hold fewer than `cap` entries but never more.
/// Returns the number of removed entries.
pub fn trim_to_capacity(interests: &mut HashMap<String, f64>, cap: usize) -> usize {
    let len = interests.len();
    if len <= cap {
        return 0;
    }
    if cap == 0 {
        interests.clear();
        return len;
    }

    let mut weights: Vec<f64> = interests.values().copied().collect();
    weights.sort_by(|a, b| a.total_cmp(b));

    let idx = len - cap;
    let threshold = weights[idx];
    let straddles = weights[idx - 1] == threshold;

    interests.retain(|_, w| {
        if straddles {
            *w > threshold
        } else {
            *w >= threshold
        }
    });
    len - interests.len()
}
