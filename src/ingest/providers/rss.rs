// src/ingest/providers/rss.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::OffsetDateTime;

use crate::ingest::normalize_text;
use crate::ingest::types::FeedProvider;
use crate::ranking::FeedItem;
use crate::telemetry::ensure_metrics_described;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(default)]
    title: Option<String>,
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(default)]
    title: Option<String>,
    #[serde(rename = "entry", default)]
    entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    title: Option<String>,
    #[serde(rename = "link", default)]
    link: Vec<AtomLink>,
    summary: Option<String>,
    content: Option<String>,
    published: Option<String>,
    updated: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

impl Entry {
    /// `rel="alternate"` (or no rel) first, then whatever link comes first.
    fn alternate_href(&self) -> Option<&str> {
        self.link
            .iter()
            .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
            .or_else(|| self.link.first())
            .and_then(|l| l.href.as_deref())
    }
}

/// Feed-format agnostic view of one entry before normalization.
struct RawItem {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    published: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedKind {
    Rss,
    Atom,
}

/// Local name of the first element decides the format.
fn detect_kind(xml: &str) -> Result<FeedKind> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event().context("reading feed root")? {
            Event::Start(e) | Event::Empty(e) => {
                return match e.local_name().as_ref() {
                    b"rss" => Ok(FeedKind::Rss),
                    b"feed" => Ok(FeedKind::Atom),
                    other => anyhow::bail!(
                        "unsupported feed root <{}>",
                        String::from_utf8_lossy(other)
                    ),
                };
            }
            Event::Eof => anyhow::bail!("empty feed document"),
            _ => {}
        }
    }
}

fn to_utc(dt: OffsetDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(dt.unix_timestamp(), 0)
}

/// RFC 2822 `pubDate` to UTC; the Unix epoch when absent or unparsable.
fn parse_pub_date(ts: Option<&str>) -> DateTime<Utc> {
    ts.and_then(|s| OffsetDateTime::parse(s.trim(), &Rfc2822).ok())
        .and_then(to_utc)
        .unwrap_or_default()
}

/// RFC 3339 Atom timestamp to UTC; the Unix epoch when absent or unparsable.
fn parse_atom_date(ts: Option<&str>) -> DateTime<Utc> {
    ts.and_then(|s| OffsetDateTime::parse(s.trim(), &Rfc3339).ok())
        .and_then(to_utc)
        .unwrap_or_default()
}

fn read_rss(xml: &str) -> Result<(Option<String>, Vec<RawItem>)> {
    let rss: Rss = from_str(xml).context("parsing rss xml")?;
    let items = rss
        .channel
        .item
        .into_iter()
        .map(|it| RawItem {
            published: parse_pub_date(it.pub_date.as_deref()),
            title: it.title,
            link: it.link,
            description: it.description,
        })
        .collect();
    Ok((rss.channel.title, items))
}

fn read_atom(xml: &str) -> Result<(Option<String>, Vec<RawItem>)> {
    let feed: AtomFeed = from_str(xml).context("parsing atom xml")?;
    let items = feed
        .entry
        .into_iter()
        .map(|e| RawItem {
            link: e.alternate_href().map(str::to_string),
            published: parse_atom_date(e.published.as_deref().or(e.updated.as_deref())),
            title: e.title,
            description: e.summary.or(e.content),
        })
        .collect();
    Ok((feed.title, items))
}

/// Parse an RSS 2.0 or Atom document. The channel/feed title becomes
/// `feed_source`, `fallback_source` is used when the feed has none.
pub fn parse_feed_str(xml: &str, fallback_source: &str) -> Result<Vec<FeedItem>> {
    ensure_metrics_described();
    let t0 = std::time::Instant::now();

    let xml_clean = scrub_html_entities_for_xml(xml);
    let (title, raw) = match detect_kind(&xml_clean)? {
        FeedKind::Rss => read_rss(&xml_clean)?,
        FeedKind::Atom => read_atom(&xml_clean)?,
    };

    let source = title
        .as_deref()
        .map(normalize_text)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| fallback_source.to_string());

    let mut out = Vec::with_capacity(raw.len());
    for it in raw {
        let title = normalize_text(it.title.as_deref().unwrap_or_default());
        let description = normalize_text(it.description.as_deref().unwrap_or_default());
        if title.is_empty() && description.is_empty() {
            continue;
        }
        out.push(FeedItem {
            title,
            description,
            link: it.link.map(|l| l.trim().to_string()).unwrap_or_default(),
            published: it.published,
            feed_source: source.clone(),
        });
    }

    if out.is_empty() {
        tracing::warn!(target: "ingest", feed = %source, "feed contains no items");
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("feed_parse_ms").record(ms);
    counter!("feed_items_total").increment(out.len() as u64);
    Ok(out)
}

pub struct RssFeedProvider {
    name: String,
    mode: Mode,
}

enum Mode {
    Document(String),
    #[cfg(feature = "ingest-http")]
    Http {
        url: String,
        client: reqwest::Client,
    },
}

impl RssFeedProvider {
    /// Provider over an in-memory RSS or Atom document (local file, fixture, cached body).
    pub fn from_xml(name: impl Into<String>, xml: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: Mode::Document(xml.into()),
        }
    }

    #[cfg(feature = "ingest-http")]
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            name: url.clone(),
            mode: Mode::Http {
                url,
                client: reqwest::Client::new(),
            },
        }
    }
}

#[async_trait]
impl FeedProvider for RssFeedProvider {
    async fn fetch_items(&self) -> Result<Vec<FeedItem>> {
        match &self.mode {
            Mode::Document(s) => parse_feed_str(s, &self.name),

            #[cfg(feature = "ingest-http")]
            Mode::Http { url, client } => {
                let body = client
                    .get(url.as_str())
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .with_context(|| format!("GET {url}"))?
                    .text()
                    .await
                    .with_context(|| format!("reading body of {url}"))?;
                parse_feed_str(&body, &self.name)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// HTML entities that are common in feeds but undefined in XML.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}
