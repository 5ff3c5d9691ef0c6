// src/source/mod.rs
//! Watched announcement sources. Each source knows how to fetch its own blog
//! index, pick the latest qualifying post, and pull the article text.

pub mod fairyloot;
pub mod illumicrate;
pub mod owlcrate;

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

/// A single published item from a watched source. The canonical URL is the
/// deduplication key and must be stable per distinct post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub source: String,
    pub url: String,
    pub body: String,
}

#[async_trait]
pub trait Source: Send + Sync {
    /// The latest qualifying announcement, or `None` when the source has
    /// nothing new this cycle. `None` is a normal outcome, not an error.
    async fn latest(&self) -> Result<Option<Announcement>>;
    fn name(&self) -> &'static str;
}

/// Shared HTTP client for the scrapers: 20s request budget per page.
pub(crate) fn scrape_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent("Mozilla/5.0 (compatible; boxwatch/0.1)")
        .connect_timeout(Duration::from_secs(4))
        .timeout(Duration::from_secs(20))
        .build()
        .context("building scrape HTTP client")
}

pub(crate) async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String> {
    tracing::info!(url, "scraping");
    let rsp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("requesting {url}"))?;
    let rsp = rsp
        .error_for_status()
        .with_context(|| format!("fetching {url}"))?;
    rsp.text().await.with_context(|| format!("reading {url}"))
}

/// Condense scraped article text: decode HTML entities, trim each line, and
/// collapse runs of blank lines.
pub fn condense_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);

    static RE_SPACES: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_spaces = RE_SPACES.get_or_init(|| regex::Regex::new(r"[ \t]+").unwrap());

    let mut out = String::with_capacity(decoded.len());
    for line in decoded.lines() {
        let line = re_spaces.replace_all(line.trim(), " ");
        if line.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&line);
    }
    out
}
