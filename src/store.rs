// src/store.rs
//! File-backed persistence for the profile (`profile.json`) and feed list (`feeds.txt`).

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::ingest::feed_list::{load_feed_list, parse_feed_list, render_feed_list, DEFAULT_FEEDS};
use crate::profile::{InterestProfile, ProfileLimits};

pub const ENV_DATA_DIR: &str = "FEED_RANKER_DATA_DIR";
pub const DEFAULT_DIR_NAME: &str = ".rss-reader";

const PROFILE_FILE: &str = "profile.json";
const FEEDS_FILE: &str = "feeds.txt";

#[derive(Debug, Clone)]
pub struct ProfileStore {
    data_dir: PathBuf,
}

impl ProfileStore {
    /// Use `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = dir.into();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("creating data dir {}", data_dir.display()))?;
        Ok(Self { data_dir })
    }

    /// `$FEED_RANKER_DATA_DIR`, else `$HOME/.rss-reader`.
    pub fn from_env() -> Result<Self> {
        if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
            if !dir.trim().is_empty() {
                return Self::new(dir);
            }
        }
        let home = std::env::var_os("HOME")
            .ok_or_else(|| anyhow!("neither {ENV_DATA_DIR} nor HOME is set"))?;
        Self::new(Path::new(&home).join(DEFAULT_DIR_NAME))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn profile_path(&self) -> PathBuf {
        self.data_dir.join(PROFILE_FILE)
    }

    pub fn feeds_path(&self) -> PathBuf {
        self.data_dir.join(FEEDS_FILE)
    }

    /// Load the profile; a missing file is created with a fresh, empty profile.
    pub fn load_profile(&self, limits: &ProfileLimits) -> Result<InterestProfile> {
        let path = self.profile_path();
        if !path.exists() {
            let profile = InterestProfile::new();
            self.save_profile(&profile)
                .context("creating initial profile")?;
            return Ok(profile);
        }

        let data =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let mut profile: InterestProfile =
            serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;

        let dropped = profile.sanitize(limits);
        if dropped > 0 {
            warn!(target: "store", dropped, "dropped invalid interests from stored profile");
        }
        info!(
            target: "store",
            interests = profile.interests.len(),
            read = profile.read_articles.len(),
            "profile loaded"
        );
        Ok(profile)
    }

    /// Write via a temp file + rename. `last_updated` is stored as-is.
    pub fn save_profile(&self, profile: &InterestProfile) -> Result<()> {
        let path = self.profile_path();
        let tmp = self.data_dir.join(format!("{PROFILE_FILE}.tmp"));

        let data = serde_json::to_string_pretty(profile).context("serializing profile")?;
        fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("renaming to {}", path.display()))?;

        info!(
            target: "store",
            interests = profile.interests.len(),
            "profile saved"
        );
        Ok(())
    }

    /// Load the feed URLs; a missing file is created with [`DEFAULT_FEEDS`].
    pub fn load_feeds(&self) -> Result<Vec<String>> {
        let path = self.feeds_path();
        if !path.exists() {
            let defaults: Vec<String> = DEFAULT_FEEDS.iter().map(|s| s.to_string()).collect();
            self.save_feeds(&defaults)
                .context("creating default feeds file")?;
            return Ok(defaults);
        }

        let content =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let list = parse_feed_list(&content);
        for bad in &list.invalid {
            warn!(target: "store", line = bad.line, value = %bad.value, "skipping invalid feed url");
        }
        info!(target: "store", feeds = list.urls.len(), "feeds loaded");
        Ok(list.urls)
    }

    /// Feed URLs to fetch. An existing list at `preferred` wins over the
    /// data-dir list, which is created with the defaults when missing.
    pub fn resolve_feeds(&self, preferred: &Path) -> Result<Vec<String>> {
        if preferred.exists() {
            info!(target: "store", path = %preferred.display(), "using configured feed list");
            return Ok(load_feed_list(preferred)?.urls);
        }
        self.load_feeds()
    }

    pub fn save_feeds<S: AsRef<str>>(&self, urls: &[S]) -> Result<()> {
        let path = self.feeds_path();
        fs::write(&path, render_feed_list(urls))
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}
