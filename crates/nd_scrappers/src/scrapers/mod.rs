use async_trait::async_trait;
use nd_core::{Result, FAILED_TO_LOAD, NO_CONTENT_FOUND};

pub mod naver;

pub use naver::NaverScraper;

#[derive(Debug, Clone)]
pub struct SourceMetadata {
    pub name: &'static str,
    pub emoji: &'static str,
}

/// One search hit as extracted from a result page, before deduplication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchItem {
    pub title: String,
    pub link: Option<String>,
    pub press: Option<String>,
    pub date: Option<String>,
}

/// Result of fetching an article body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Content(String),
    /// The page loaded but had no body container
    NoContent,
    Failed(String),
}

impl FetchOutcome {
    /// Collapses the outcome into the text stored in the dataset.
    pub fn into_content(self) -> String {
        match self {
            FetchOutcome::Content(body) => body,
            FetchOutcome::NoContent => NO_CONTENT_FOUND.to_string(),
            FetchOutcome::Failed(_) => FAILED_TO_LOAD.to_string(),
        }
    }
}

#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetches the full body of an article. Never fails: errors degrade into
    /// `FetchOutcome::Failed`.
    async fn fetch_content(&self, link: &str) -> FetchOutcome;
}

#[async_trait]
pub trait Scraper: ContentFetcher {
    fn source_metadata(&self) -> SourceMetadata;

    /// Runs one search. The outer error means the request itself failed; the
    /// inner results are per-item parse outcomes, in page order.
    async fn search(&self, query: &str) -> Result<Vec<Result<SearchItem>>>;

    /// Returns a list of CLI shorthand names for this scraper
    fn cli_names(&self) -> Vec<&str> {
        vec![]
    }
}

/// Common utilities for scrapers
pub(crate) mod utils {
    use nd_core::{Error, Result};
    use scraper::{ElementRef, Selector};
    use url::Url;

    pub fn parse_url(url: &str) -> Result<Url> {
        Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))
    }

    pub fn selector(css: &str) -> Result<Selector> {
        Selector::parse(css).map_err(|e| Error::Scraping(format!("Invalid selector {}: {}", css, e)))
    }

    /// Concatenated, trimmed text of the first match under `root`.
    pub fn first_text(root: ElementRef<'_>, selector: &Selector) -> Option<String> {
        root.select(selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
    }

    /// Every text node trimmed, blanks dropped, joined with `separator`.
    pub fn joined_text(root: ElementRef<'_>, separator: &str) -> String {
        root.text()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(separator)
    }
}
