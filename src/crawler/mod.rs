// ============================================================
// Layer 4 — Review Crawler
// ============================================================
// Collects raw review text from a movie review site. One call
// to harvest() blocks until the crawl is finished and returns
// everything it collected as a fresh list.
//
// The crawl is a single pass:
//   1. GET the target page
//   2. Extract review text nodes by CSS selector
//   3. Follow the "next page" link, resolved against the
//      current page URL, while one exists and the page limit
//      has not been reached
//
// No retry, no backpressure: a network or selector failure
// aborts the crawl and propagates to the caller.
//
// Reference: reqwest::blocking and scraper crate documentation

use anyhow::{Context, Result};
use scraper::{Html, Selector};

use crate::domain::traits::TextHarvester;

/// Review sites block the default library User-Agent.
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0 Safari/537.36";

// ─── CrawlerConfig ────────────────────────────────────────────────────────────

/// Selectors and limits for one crawl target.
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// CSS selector matching the review text nodes on a page
    pub review_selector: String,

    /// CSS selector matching the link to the next result page
    pub next_selector: String,

    /// Upper bound on pages fetched in one harvest
    pub max_pages: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            review_selector: "div.score_reple p".to_string(),
            next_selector:   "a.pg_next".to_string(),
            max_pages:       100,
        }
    }
}

// ─── MovieCrawler ─────────────────────────────────────────────────────────────

/// Blocking crawler for paginated review listings.
pub struct MovieCrawler {
    client: reqwest::blocking::Client,
    config: CrawlerConfig,
}

impl MovieCrawler {
    pub fn new(config: CrawlerConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Cannot build HTTP client")?;
        Ok(Self { client, config })
    }

    fn fetch(&self, url: &str) -> Result<String> {
        self.client
            .get(url)
            .send()
            .with_context(|| format!("Request to '{url}' failed"))?
            .error_for_status()
            .with_context(|| format!("Server rejected request to '{url}'"))?
            .text()
            .with_context(|| format!("Cannot read page body from '{url}'"))
    }
}

impl TextHarvester for MovieCrawler {
    fn harvest(&self, url: &str) -> Result<Vec<String>> {
        let review_sel = parse_selector(&self.config.review_selector)?;
        let next_sel   = parse_selector(&self.config.next_selector)?;

        // A fresh list per call — nothing is shared between harvests.
        let mut texts   = Vec::new();
        let mut current = url.to_string();

        for page in 1..=self.config.max_pages {
            tracing::info!("Fetching page {}: {}", page, current);
            let body     = self.fetch(&current)?;
            let document = Html::parse_document(&body);

            let page_texts = extract_reviews(&document, &review_sel);
            tracing::debug!("Extracted {} reviews from page {}", page_texts.len(), page);
            texts.extend(page_texts);

            match next_page_url(&document, &next_sel, &current)? {
                Some(next) if next != current => current = next,
                _ => break,
            }
        }

        tracing::info!("Harvest finished: {} reviews from '{}'", texts.len(), url);
        Ok(texts)
    }
}

/// scraper's selector error borrows the input, so it is mapped
/// to an owned message before leaving this module.
fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("Invalid CSS selector '{css}': {e}"))
}

/// Text content of every review node, skipping empty matches.
fn extract_reviews(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .map(|node| {
            node.text()
                .collect::<Vec<_>>()
                .join(" ")
                .trim()
                .to_string()
        })
        .filter(|text| !text.is_empty())
        .collect()
}

/// Absolute URL of the next result page, if the page links one.
fn next_page_url(document: &Html, selector: &Selector, base: &str) -> Result<Option<String>> {
    let Some(href) = document
        .select(selector)
        .find_map(|node| node.value().attr("href"))
    else {
        return Ok(None);
    };

    let base = reqwest::Url::parse(base)
        .with_context(|| format!("Invalid page URL '{base}'"))?;
    let next = base
        .join(href)
        .with_context(|| format!("Invalid next-page link '{href}'"))?;

    Ok(Some(next.to_string()))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div class="score_reple"><p>Best film of the year</p></div>
          <div class="score_reple"><p> spoiler-free and <em>gripping</em> </p></div>
          <div class="score_reple"><p>   </p></div>
          <a class="pg_next" href="?page=2">next</a>
        </body></html>
    "#;

    #[test]
    fn test_extracts_review_text_nodes() {
        let document = Html::parse_document(PAGE);
        let selector = parse_selector("div.score_reple p").unwrap();
        let texts    = extract_reviews(&document, &selector);
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0], "Best film of the year");
        assert_eq!(texts[1], "spoiler-free and gripping");
    }

    #[test]
    fn test_next_link_resolves_against_page_url() {
        let document = Html::parse_document(PAGE);
        let selector = parse_selector("a.pg_next").unwrap();
        let next = next_page_url(&document, &selector, "https://movies.example/reviews?page=1")
            .unwrap();
        assert_eq!(
            next.as_deref(),
            Some("https://movies.example/reviews?page=2")
        );
    }

    #[test]
    fn test_missing_next_link_ends_the_crawl() {
        let document = Html::parse_document("<html><body><p>last page</p></body></html>");
        let selector = parse_selector("a.pg_next").unwrap();
        let next = next_page_url(&document, &selector, "https://movies.example/reviews").unwrap();
        assert!(next.is_none());
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        assert!(parse_selector("p[").is_err());
    }
}
