// src/config/mod.rs
//! Ranker configuration from TOML. Every field is optional.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::profile::ProfileLimits;

pub const ENV_CONFIG_PATH: &str = "FEED_RANKER_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/ranker.toml";

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_FEED_LIST_PATH: &str = "feeds.txt";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RankerConfig {
    pub profile: ProfileLimits,
    pub display: DisplayCfg,
    pub feeds: FeedsCfg,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayCfg {
    pub page_size: usize,
}

impl Default for DisplayCfg {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedsCfg {
    /// Feed list that, when the file exists, is used instead of the data-dir list.
    pub list_path: PathBuf,
}

impl Default for FeedsCfg {
    fn default() -> Self {
        Self {
            list_path: PathBuf::from(DEFAULT_FEED_LIST_PATH),
        }
    }
}

impl RankerConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: RankerConfig = toml::from_str(s).context("parsing ranker config")?;
        Ok(cfg.sanitized())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading ranker config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Resolution order:
    /// 1) $FEED_RANKER_CONFIG_PATH (must exist)
    /// 2) config/ranker.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from(&default_p);
        }
        Ok(Self::default())
    }

    fn sanitized(mut self) -> Self {
        self.profile = self.profile.sanitized();
        if self.display.page_size == 0 {
            self.display.page_size = DEFAULT_PAGE_SIZE;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{DECAY_FACTOR, MAX_INTERESTS, MIN_WEIGHT};

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg = RankerConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, RankerConfig::default());
        assert_eq!(cfg.profile.max_interests, MAX_INTERESTS);
        assert_eq!(cfg.display.page_size, 10);
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let cfg = RankerConfig::from_toml_str(
            r#"
[profile]
max_interests = 50

[display]
page_size = 25
"#,
        )
        .unwrap();
        assert_eq!(cfg.profile.max_interests, 50);
        assert!((cfg.profile.min_weight - MIN_WEIGHT).abs() < 1e-12);
        assert!((cfg.profile.decay_factor - DECAY_FACTOR).abs() < 1e-12);
        assert_eq!(cfg.display.page_size, 25);
        assert_eq!(cfg.feeds.list_path, PathBuf::from("feeds.txt"));
    }

    #[test]
    fn out_of_range_values_are_replaced() {
        let cfg = RankerConfig::from_toml_str(
            r#"
[profile]
decay_factor = 1.7
min_weight = -1.0

[display]
page_size = 0
"#,
        )
        .unwrap();
        assert!((cfg.profile.decay_factor - DECAY_FACTOR).abs() < 1e-12);
        assert!((cfg.profile.min_weight - MIN_WEIGHT).abs() < 1e-12);
        assert_eq!(cfg.display.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(RankerConfig::from_toml_str("[profile\nmax_interests = ").is_err());
    }
}
