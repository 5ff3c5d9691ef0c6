// src/source/fairyloot.rs
//! FairyLoot book-announcements scraper. The category page already filters to
//! announcements, so the featured post qualifies without a keyword check.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{condense_text, fetch_page, scrape_client, Announcement, Source};

const INDEX_URL: &str = "https://community.fairyloot.com/category/book-announcements/";

static SEL_FEATURED_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("article.global-featuredBlogPost a.btn-small").expect("featured link selector")
});
static SEL_ARTICLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".singleBlog-content .wysiwyg").expect("article selector"));

pub struct FairyLoot {
    http: reqwest::Client,
}

impl FairyLoot {
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: scrape_client()?,
        })
    }
}

#[async_trait]
impl Source for FairyLoot {
    async fn latest(&self) -> Result<Option<Announcement>> {
        let index = fetch_page(&self.http, INDEX_URL).await?;
        // Links on this page are absolute.
        let url = featured_href(&index)?;
        let page = fetch_page(&self.http, &url).await?;
        let body = article_text(&page)?;
        Ok(Some(Announcement {
            source: "FairyLoot".to_string(),
            url,
            body,
        }))
    }

    fn name(&self) -> &'static str {
        "fairyloot"
    }
}

fn featured_href(html: &str) -> Result<String> {
    let doc = Html::parse_document(html);
    let link = doc
        .select(&SEL_FEATURED_LINK)
        .next()
        .ok_or_else(|| anyhow!("featured post link not found on {INDEX_URL}"))?;
    Ok(link
        .value()
        .attr("href")
        .context("featured post link has no href")?
        .to_string())
}

fn article_text(html: &str) -> Result<String> {
    let doc = Html::parse_document(html);
    let article = doc
        .select(&SEL_ARTICLE)
        .next()
        .ok_or_else(|| anyhow!("article content not found"))?;
    Ok(condense_text(&article.text().collect::<String>()))
}
