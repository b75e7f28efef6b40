// tests/store_roundtrip.rs
use chrono::{Duration, TimeZone, Utc};
use feed_interest_ranker::profile::ProfileLimits;
use feed_interest_ranker::store::{ProfileStore, ENV_DATA_DIR};
use feed_interest_ranker::InterestProfile;
use std::{env, fs};

#[test]
fn saved_profile_loads_back_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProfileStore::new(dir.path()).unwrap();

    let t = Utc.with_ymd_and_hms(2024, 4, 2, 7, 30, 0).unwrap();
    let mut p = InterestProfile::new_at(t);
    p.update_at("observability tracing metrics tracing", t);
    p.mark_read("https://a.test/1");

    store.save_profile(&p).unwrap();
    let loaded = store.load_profile(&ProfileLimits::default()).unwrap();
    assert_eq!(loaded, p);
}

#[test]
fn saving_does_not_advance_last_updated() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProfileStore::new(dir.path()).unwrap();

    let old = Utc::now() - Duration::days(3);
    let p = InterestProfile::new_at(old);
    store.save_profile(&p).unwrap();

    let loaded = store.load_profile(&ProfileLimits::default()).unwrap();
    assert_eq!(loaded.last_updated, old);
}

#[test]
fn load_trims_oversized_profile_to_limits() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProfileStore::new(dir.path()).unwrap();

    let mut p = InterestProfile::new();
    for i in 0..10 {
        p.interests.insert(format!("kw{i}"), 1.0 + i as f64);
    }
    store.save_profile(&p).unwrap();

    let limits = ProfileLimits {
        max_interests: 4,
        ..Default::default()
    };
    let loaded = store.load_profile(&limits).unwrap();
    assert_eq!(loaded.interests.len(), 4);
    assert!(loaded.weight("kw9").is_some());
    assert!(loaded.weight("kw5").is_none());
}

#[test]
fn feeds_roundtrip_skips_invalid_lines() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProfileStore::new(dir.path()).unwrap();

    store
        .save_feeds(&["https://a.test/rss", "https://b.test/feed.xml"])
        .unwrap();
    let mut text = fs::read_to_string(store.feeds_path()).unwrap();
    text.push_str("not-a-url\n");
    fs::write(store.feeds_path(), text).unwrap();

    let feeds = store.load_feeds().unwrap();
    assert_eq!(feeds, vec!["https://a.test/rss", "https://b.test/feed.xml"]);
}

#[serial_test::serial]
#[test]
fn from_env_uses_data_dir_variable() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("ranker-data");
    env::set_var(ENV_DATA_DIR, &target);

    let store = ProfileStore::from_env().unwrap();
    assert_eq!(store.data_dir(), target.as_path());
    assert!(target.is_dir());

    env::remove_var(ENV_DATA_DIR);
}
