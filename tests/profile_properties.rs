// tests/profile_properties.rs
// Property-style checks of the profile update pipeline over a deterministic
// synthetic stream of updates.

use chrono::{DateTime, Duration, TimeZone, Utc};
use feed_interest_ranker::extract_keywords;
use feed_interest_ranker::keywords::STOP_WORDS;
use feed_interest_ranker::profile::{InterestProfile, MAX_INTERESTS, MIN_WEIGHT};

const EPS: f64 = 1e-9;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

// Tiny LCG so the suite is reproducible without extra deps.
struct Lcg(u64);

impl Lcg {
    fn next_usize(&mut self, n: usize) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % n
    }
}

fn synthetic_text(rng: &mut Lcg, vocab: &[String]) -> String {
    let n = 1 + rng.next_usize(40);
    (0..n)
        .map(|_| vocab[rng.next_usize(vocab.len())].as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn extracted_tokens_obey_filter() {
    let text = "The QUICK brown fox, and THAT lazy Dog jumps over your fence from Here";
    for kw in extract_keywords(text) {
        assert!(kw.chars().count() > 3, "{kw}");
        assert!(!STOP_WORDS.contains(&kw.as_str()), "{kw}");
        assert_eq!(kw, kw.to_lowercase());
    }
}

#[test]
fn invariants_hold_across_many_updates() {
    let vocab: Vec<String> = (0..400).map(|i| format!("topic{i:03}")).collect();
    let mut rng = Lcg(42);
    let mut p = InterestProfile::new_at(t0());
    let mut now = t0();

    for _ in 0..300 {
        now += Duration::minutes(rng.next_usize(60 * 36) as i64);
        let prev = p.last_updated;
        p.update_at(&synthetic_text(&mut rng, &vocab), now);

        assert!(p.last_updated >= prev);
        assert_eq!(p.last_updated, now);
        assert!(p.interests.len() <= MAX_INTERESTS);
        assert!(p.interests.values().all(|&w| w >= MIN_WEIGHT));
    }
}

#[test]
fn empty_update_without_elapsed_time_keeps_weights() {
    let mut p = InterestProfile::new_at(t0());
    p.update_at("distributed systems consensus raft raft", t0());
    let before = p.interests.clone();

    p.update_at("", t0());
    assert_eq!(p.interests, before);
}

#[test]
fn one_day_of_decay() {
    let mut p = InterestProfile::new_at(t0() - Duration::hours(24));
    p.interests.insert("compilers".into(), 1.0);

    p.update_at("", t0());
    let w = p.weight("compilers").expect("0.95 is above the eviction threshold");
    assert!((w - 0.95).abs() < EPS);
}

#[test]
fn wall_clock_update_decays_by_one_day() {
    let mut p = InterestProfile::new_at(Utc::now() - Duration::hours(24));
    p.interests.insert("compilers".into(), 1.0);

    p.update("");
    // a few ms pass between the two clock reads
    let w = p.weight("compilers").unwrap();
    assert!((w - 0.95).abs() < 1e-6);
}

#[test]
fn eviction_boundary() {
    let mut p = InterestProfile::new_at(t0());
    p.interests.insert("exact".into(), 0.1);
    p.interests.insert("below".into(), 0.099_999_999);

    p.update_at("", t0());
    assert!(p.weight("exact").is_some());
    assert!(p.weight("below").is_none());
}

#[test]
fn single_huge_update_respects_capacity() {
    // 120 distinct words with distinct counts: the 100 most frequent survive.
    let mut words = Vec::new();
    for i in 0..120 {
        for _ in 0..=i {
            words.push(format!("word{i:03}"));
        }
    }
    let mut p = InterestProfile::new_at(t0());
    p.update_at(&words.join(" "), t0());

    assert_eq!(p.interests.len(), MAX_INTERESTS);
    assert!(p.weight("word019").is_none());
    assert!(p.weight("word020").is_some());
    assert!((p.weight("word119").unwrap() - 120.0).abs() < EPS);
}
