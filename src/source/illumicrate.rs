// src/source/illumicrate.rs
//! Illumicrate news scraper. Article cards carry the post title in the link's
//! aria-label; only "exclusive:" posts qualify.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{condense_text, fetch_page, scrape_client, Announcement, Source};

const ORIGIN: &str = "https://us.illumicrate.com";
const INDEX_URL: &str = "https://us.illumicrate.com/blogs/news";
const KEYWORD: &str = "exclusive:";

static SEL_CARD_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".article-card > a").expect("card link selector"));
static SEL_ARTICLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".article__content").expect("article selector"));

pub struct Illumicrate {
    http: reqwest::Client,
}

impl Illumicrate {
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: scrape_client()?,
        })
    }
}

#[async_trait]
impl Source for Illumicrate {
    async fn latest(&self) -> Result<Option<Announcement>> {
        let index = fetch_page(&self.http, INDEX_URL).await?;
        let (label, href) = first_card(&index)?;

        if !label.to_lowercase().contains(KEYWORD) {
            tracing::info!(source = self.name(), %label, "latest post is not an exclusive");
            return Ok(None);
        }

        let url = format!("{ORIGIN}{href}");
        let page = fetch_page(&self.http, &url).await?;
        let body = article_text(&page)?;
        Ok(Some(Announcement {
            source: "Illumicrate".to_string(),
            url,
            body,
        }))
    }

    fn name(&self) -> &'static str {
        "illumicrate"
    }
}

/// aria-label and relative href of the newest article card.
fn first_card(html: &str) -> Result<(String, String)> {
    let doc = Html::parse_document(html);
    let link = doc
        .select(&SEL_CARD_LINK)
        .next()
        .ok_or_else(|| anyhow!("article card link not found on {INDEX_URL}"))?;
    let label = link
        .value()
        .attr("aria-label")
        .context("article card link has no aria-label")?
        .to_string();
    let href = link
        .value()
        .attr("href")
        .context("article card link has no href")?
        .to_string();
    Ok((label, href))
}

fn article_text(html: &str) -> Result<String> {
    let doc = Html::parse_document(html);
    let article = doc
        .select(&SEL_ARTICLE)
        .next()
        .ok_or_else(|| anyhow!("article content not found"))?;
    Ok(condense_text(&article.text().collect::<String>()))
}
