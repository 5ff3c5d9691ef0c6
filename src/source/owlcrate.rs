// src/source/owlcrate.rs
//! OwlCrate blog scraper. Only featured posts whose title mentions a limited
//! edition qualify.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{condense_text, fetch_page, scrape_client, Announcement, Source};

const ORIGIN: &str = "https://www.owlcrate.com";
const INDEX_URL: &str = "https://www.owlcrate.com/blogs/oc";
const KEYWORD: &str = "limited edition";

static SEL_FEATURED_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".featured__blog__container a.article__link").expect("featured link selector")
});
static SEL_FEATURED_TITLE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".featured__blog__container .featured__blog__sub__heading h1")
        .expect("featured title selector")
});
static SEL_ARTICLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#bloggy--article").expect("article selector"));

pub struct OwlCrate {
    http: reqwest::Client,
}

impl OwlCrate {
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: scrape_client()?,
        })
    }
}

#[async_trait]
impl Source for OwlCrate {
    async fn latest(&self) -> Result<Option<Announcement>> {
        let index = fetch_page(&self.http, INDEX_URL).await?;
        let (title, href) = featured_post(&index)?;

        if !title.to_lowercase().contains(KEYWORD) {
            tracing::info!(source = self.name(), %title, "latest post is not a limited edition");
            return Ok(None);
        }

        let url = format!("{ORIGIN}{href}");
        let page = fetch_page(&self.http, &url).await?;
        let body = article_text(&page)?;
        Ok(Some(Announcement {
            source: "OwlCrate".to_string(),
            url,
            body,
        }))
    }

    fn name(&self) -> &'static str {
        "owlcrate"
    }
}

/// Title and relative href of the featured blog post.
fn featured_post(html: &str) -> Result<(String, String)> {
    let doc = Html::parse_document(html);
    let link = doc
        .select(&SEL_FEATURED_LINK)
        .next()
        .ok_or_else(|| anyhow!("featured post link not found on {INDEX_URL}"))?;
    let href = link
        .value()
        .attr("href")
        .context("featured post link has no href")?
        .to_string();
    let title = doc
        .select(&SEL_FEATURED_TITLE)
        .next()
        .ok_or_else(|| anyhow!("featured post title not found on {INDEX_URL}"))?
        .text()
        .collect::<String>()
        .trim()
        .to_string();
    Ok((title, href))
}

fn article_text(html: &str) -> Result<String> {
    let doc = Html::parse_document(html);
    let article = doc
        .select(&SEL_ARTICLE)
        .next()
        .ok_or_else(|| anyhow!("article content not found"))?;
    Ok(condense_text(&article.text().collect::<String>()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = r#"
        <div class="featured__blog__container">
          <div class="featured__blog__sub__heading"><h1> OwlCrate Limited Edition: Starling House </h1></div>
          <a class="article__link" href="/blogs/oc/starling-house">Read more</a>
        </div>"#;

    #[test]
    fn featured_post_extracts_title_and_href() {
        let (title, href) = featured_post(INDEX).unwrap();
        assert_eq!(title, "OwlCrate Limited Edition: Starling House");
        assert_eq!(href, "/blogs/oc/starling-house");
    }

    #[test]
    fn missing_featured_link_is_an_error() {
        assert!(featured_post("<html><body></body></html>").is_err());
    }

    #[test]
    fn article_text_is_condensed() {
        let html = "<div id=\"bloggy--article\">\n  Sale opens\n\n\n  June 3rd\n</div>";
        let body = article_text(html).unwrap();
        assert_eq!(body, "Sale opens\nJune 3rd");
    }
}
