// src/telemetry.rs
//! Tracing setup and one-time metric descriptions.

use metrics::{describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const DEFAULT_LOG_FILTER: &str = "feed_interest_ranker=info,warn";

/// `FEED_RANKER_LOG_FORMAT=json` switches the fmt layer to JSON lines.
pub const ENV_LOG_FORMAT: &str = "FEED_RANKER_LOG_FORMAT";

/// One-time metrics registration (so series show up once a recorder is installed).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("profile_updates_total", "Profile update calls.");
        describe_counter!(
            "profile_evicted_total",
            "Interests removed by decay eviction or capacity trimming."
        );
        describe_gauge!("profile_interests", "Interest count after the last update.");
        describe_counter!(
            "rank_candidates_total",
            "Unread items considered for ranking."
        );
        describe_counter!(
            "rank_recommended_total",
            "Items with a non-zero score returned by the ranker."
        );
        describe_counter!("feed_items_total", "Items parsed from feed providers.");
        describe_counter!(
            "feed_provider_errors_total",
            "Feed provider fetch/parse errors."
        );
        describe_histogram!("feed_parse_ms", "Feed parse time in milliseconds.");
    });
}

/// Install a global subscriber. Honors `RUST_LOG`; safe to call more than once.
pub fn init_tracing() {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        let json = std::env::var(ENV_LOG_FORMAT)
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        // try_init: a test harness or host app may already own the global subscriber.
        let _ = if json {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json())
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact())
                .try_init()
        };
    });
}
