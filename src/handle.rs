// src/handle.rs
/* ----------------------------
Thread-safe profile handle
---------------------------- */

use chrono::{DateTime, Utc};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::profile::{InterestProfile, ProfileLimits};
use crate::ranking::{self, ArticleScore, FeedItem};

/// Shared owner of one profile. Clones point at the same profile, so a UI task
/// marking articles and a refresh task ranking a batch see one consistent value.
#[derive(Debug, Clone)]
pub struct ProfileHandle {
    inner: Arc<RwLock<InterestProfile>>,
    limits: ProfileLimits,
}

impl ProfileHandle {
    pub fn new(profile: InterestProfile) -> Self {
        Self::with_limits(profile, ProfileLimits::default())
    }

    pub fn with_limits(profile: InterestProfile, limits: ProfileLimits) -> Self {
        Self {
            inner: Arc::new(RwLock::new(profile)),
            limits,
        }
    }

    // Poisoned locks are taken over; the profile stays usable.
    fn read(&self) -> RwLockReadGuard<'_, InterestProfile> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, InterestProfile> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn limits(&self) -> &ProfileLimits {
        &self.limits
    }

    pub fn update(&self, text: &str) {
        self.update_at(text, Utc::now());
    }

    pub fn update_at(&self, text: &str, now: DateTime<Utc>) {
        self.write().update_with_limits(text, now, &self.limits);
    }

    /// Record "interesting" feedback: learn from the item text and hide it from
    /// future recommendations, under one write lock.
    pub fn mark_interesting(&self, item: &FeedItem) {
        let mut guard = self.write();
        guard.update_with_limits(&item.text(), Utc::now(), &self.limits);
        guard.mark_read(&item.link);
    }

    pub fn mark_read(&self, link: &str) {
        self.write().mark_read(link);
    }

    pub fn is_read(&self, link: &str) -> bool {
        self.read().is_read(link)
    }

    pub fn rank(&self, items: &[FeedItem]) -> Vec<ArticleScore> {
        ranking::rank(items, &self.read())
    }

    pub fn sort_by_date(&self, items: &[FeedItem]) -> Vec<ArticleScore> {
        ranking::sort_by_date(items, &self.read())
    }

    pub fn interests_by_weight(&self) -> Vec<(String, f64)> {
        self.read().interests_by_weight()
    }

    /// Clone of the current profile, e.g. for persisting.
    pub fn snapshot(&self) -> InterestProfile {
        self.read().clone()
    }
}
