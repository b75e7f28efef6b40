//! feed-ranker: command-line entrypoint.
//!
//! ```text
//! feed-ranker recommend [FEED.xml ...]   top recommendations by score
//! feed-ranker latest    [FEED.xml ...]   recommendations, newest first
//! feed-ranker search <TERM> [FEED.xml ...]
//! feed-ranker like <LINK>   [FEED.xml ...]   learn from an article and mark it read
//! feed-ranker interests                   list interest weights
//! ```
//!
//! Without feed files the stored feed list is fetched (requires `ingest-http`).

use anyhow::{bail, Context, Result};
use std::sync::Arc;

use feed_interest_ranker::config::RankerConfig;
use feed_interest_ranker::ingest::{fetch_all, providers::rss::RssFeedProvider, types::FeedProvider};
use feed_interest_ranker::ranking::{paginate, ArticleScore};
use feed_interest_ranker::store::ProfileStore;
use feed_interest_ranker::telemetry::init_tracing;
use feed_interest_ranker::{advanced_search, FeedItem, ProfileHandle, SearchOptions};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = RankerConfig::load_default()?;
    let store = ProfileStore::from_env()?;
    let profile = store.load_profile(&cfg.profile)?;
    let handle = ProfileHandle::with_limits(profile, cfg.profile);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (cmd, rest) = match args.split_first() {
        Some((c, r)) => (c.as_str(), r),
        None => ("recommend", &args[..]),
    };

    match cmd {
        "recommend" => {
            let items = load_items(&store, &cfg, rest).await?;
            print_scores(paginate(&handle.rank(&items), 0, cfg.display.page_size));
        }
        "latest" => {
            let items = load_items(&store, &cfg, rest).await?;
            print_scores(paginate(&handle.sort_by_date(&items), 0, cfg.display.page_size));
        }
        "search" => {
            let Some((term, files)) = rest.split_first() else {
                bail!("usage: feed-ranker search <TERM> [FEED.xml ...]");
            };
            let items = load_items(&store, &cfg, files).await?;
            let results = advanced_search(&items, term, &SearchOptions::default());
            for r in paginate(&results, 0, cfg.display.page_size) {
                println!("[{}] {} ({})", r.match_count, r.item.title, r.item.link);
            }
        }
        "like" => {
            let Some((link, files)) = rest.split_first() else {
                bail!("usage: feed-ranker like <LINK> [FEED.xml ...]");
            };
            let items = load_items(&store, &cfg, files).await?;
            let item = items
                .iter()
                .find(|it| &it.link == link)
                .with_context(|| format!("no article with link {link}"))?;
            handle.mark_interesting(item);
            store.save_profile(&handle.snapshot())?;
            println!("Added to your interests: {}", item.title);
        }
        "interests" => {
            for (word, weight) in handle.interests_by_weight() {
                println!("{word}: {weight:.2}");
            }
        }
        other => bail!("unknown command `{other}`"),
    }
    Ok(())
}

fn print_scores(scores: &[ArticleScore]) {
    if scores.is_empty() {
        println!("No recommendations yet. Mark a few articles with `like`.");
    }
    for s in scores {
        println!("{:>7.2}  {}  [{}]", s.score, s.item.title, s.item.feed_source);
        println!("         {}", s.item.link);
    }
}

async fn load_items(
    store: &ProfileStore,
    cfg: &RankerConfig,
    files: &[String],
) -> Result<Vec<FeedItem>> {
    let mut providers: Vec<Arc<dyn FeedProvider>> = Vec::new();
    if files.is_empty() {
        providers.extend(remote_providers(store, cfg)?);
    } else {
        for f in files {
            let xml = std::fs::read_to_string(f).with_context(|| format!("reading feed file {f}"))?;
            providers.push(Arc::new(RssFeedProvider::from_xml(f.clone(), xml)));
        }
    }
    Ok(fetch_all(&providers).await)
}

#[cfg(feature = "ingest-http")]
fn remote_providers(
    store: &ProfileStore,
    cfg: &RankerConfig,
) -> Result<Vec<Arc<dyn FeedProvider>>> {
    use feed_interest_ranker::ingest::feed_list::looks_like_feed_url;

    let urls = store.resolve_feeds(&cfg.feeds.list_path)?;
    Ok(urls
        .into_iter()
        .map(|u| {
            if !looks_like_feed_url(&u) {
                tracing::warn!(url = %u, "url might not be a valid RSS feed");
            }
            Arc::new(RssFeedProvider::from_url(u)) as Arc<dyn FeedProvider>
        })
        .collect())
}

#[cfg(not(feature = "ingest-http"))]
fn remote_providers(
    _store: &ProfileStore,
    _cfg: &RankerConfig,
) -> Result<Vec<Arc<dyn FeedProvider>>> {
    bail!("no feed files given and this build lacks the `ingest-http` feature")
}
