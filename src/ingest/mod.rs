// src/ingest/mod.rs
pub mod feed_list;
pub mod providers;
pub mod types;

use crate::ingest::types::FeedProvider;
use crate::ranking::FeedItem;
use crate::telemetry::ensure_metrics_described;
use metrics::counter;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Normalize feed text: decode entities, strip tags, unify quotes, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags =
        RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
    out = re_tags.replace_all(&out, " ").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace (includes the NBSP left by entity decoding)
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fetch every provider concurrently and merge the results in provider order.
///
/// A failing provider is logged and counted, the others still contribute.
/// The merged batch is not deduplicated by link.
pub async fn fetch_all(providers: &[Arc<dyn FeedProvider>]) -> Vec<FeedItem> {
    ensure_metrics_described();

    let mut set = JoinSet::new();
    for (idx, p) in providers.iter().enumerate() {
        let p = Arc::clone(p);
        set.spawn(async move {
            let res = p.fetch_items().await;
            (idx, p.name().to_string(), res)
        });
    }

    let mut batches: Vec<Vec<FeedItem>> = vec![Vec::new(); providers.len()];
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((idx, _, Ok(items))) => batches[idx] = items,
            Ok((_, name, Err(e))) => {
                tracing::warn!(target: "ingest", error = ?e, provider = %name, "provider error");
                counter!("feed_provider_errors_total").increment(1);
            }
            Err(e) => {
                tracing::warn!(target: "ingest", error = ?e, "provider task failed");
                counter!("feed_provider_errors_total").increment(1);
            }
        }
    }

    let merged: Vec<FeedItem> = batches.into_iter().flatten().collect();
    tracing::info!(
        target: "ingest",
        providers = providers.len(),
        items = merged.len(),
        "feeds merged"
    );
    merged
}
