use std::time::Duration;

use async_trait::async_trait;
use nd_core::config::CollectorConfig;
use nd_core::{Error, Result};
use reqwest::Client;
use scraper::{Html, Selector};

use super::utils;
use crate::scrapers::{ContentFetcher, FetchOutcome, Scraper, SearchItem, SourceMetadata};

/// Label of the anchor pointing at the portal-hosted copy of an article.
pub const PORTAL_LINK_LABEL: &str = "네이버뉴스";

/// CSS lookups for the news search result page and the article page.
#[derive(Debug)]
pub struct NaverSelectors {
    item: Selector,
    title: Selector,
    anchor: Selector,
    press: Selector,
    date: Selector,
    body: Selector,
}

impl NaverSelectors {
    pub fn new() -> Result<Self> {
        Ok(Self {
            item: utils::selector("div.sds-comps-vertical-layout.sds-comps-full-layout")?,
            title: utils::selector("a._228e3bd1 span.sds-comps-text-type-headline1")?,
            anchor: utils::selector("a")?,
            press: utils::selector("div.sds-comps-profile-info-title span.sds-comps-text-type-body2")?,
            date: utils::selector("span.sds-comps-profile-info-subtext span.sds-comps-text-type-body2")?,
            body: utils::selector("#dic_area")?,
        })
    }

    /// Splits a result page into items. An item whose portal anchor has no
    /// `href` is reported as an error so the caller can log and skip it.
    pub fn parse_search_page(&self, html: &str) -> Vec<Result<SearchItem>> {
        let document = Html::parse_document(html);
        document
            .select(&self.item)
            .map(|item| -> Result<SearchItem> {
                let title = utils::first_text(item, &self.title).unwrap_or_default();

                let mut link = None;
                for anchor in item.select(&self.anchor) {
                    if anchor.text().collect::<String>().trim() == PORTAL_LINK_LABEL {
                        let href = anchor.value().attr("href").ok_or_else(|| {
                            Error::Scraping(format!("portal link without href for {:?}", title))
                        })?;
                        link = Some(href.trim().to_string()).filter(|h| !h.is_empty());
                        break;
                    }
                }

                Ok(SearchItem {
                    title,
                    link,
                    press: utils::first_text(item, &self.press),
                    date: utils::first_text(item, &self.date),
                })
            })
            .collect()
    }

    /// Body text of an article page, one line per text node.
    pub fn parse_article_body(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let body = document.select(&self.body).next()?;
        Some(utils::joined_text(body, "\n"))
    }
}

pub struct NaverScraper {
    client: Client,
    base_url: String,
    selectors: NaverSelectors,
}

impl NaverScraper {
    pub fn new(config: &CollectorConfig) -> Result<Self> {
        utils::parse_url(&config.base_url)?;
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            selectors: NaverSelectors::new()?,
        })
    }

    pub fn selectors(&self) -> &NaverSelectors {
        &self.selectors
    }

    async fn get_html(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }

    /// Any page that arrives is parsed, whatever its status. Only transport
    /// errors fail.
    async fn get_page(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            tracing::debug!("Article {} answered {}", url, response.status());
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl ContentFetcher for NaverScraper {
    async fn fetch_content(&self, link: &str) -> FetchOutcome {
        if let Err(e) = utils::parse_url(link) {
            return FetchOutcome::Failed(e.to_string());
        }
        match self.get_page(link).await {
            Ok(html) => match self.selectors.parse_article_body(&html) {
                Some(body) => FetchOutcome::Content(body),
                None => FetchOutcome::NoContent,
            },
            Err(e) => {
                tracing::debug!("Failed to load article {}: {}", link, e);
                FetchOutcome::Failed(e.to_string())
            }
        }
    }
}

#[async_trait]
impl Scraper for NaverScraper {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "Naver News",
            emoji: "📰",
        }
    }

    fn cli_names(&self) -> Vec<&str> {
        vec!["naver"]
    }

    async fn search(&self, query: &str) -> Result<Vec<Result<SearchItem>>> {
        // sort=0 is relevance, nso restricts to the last day
        let params = [
            ("where", "news"),
            ("query", query),
            ("sort", "0"),
            ("nso", "so:r,p:1d"),
        ];
        let html = self.get_html(&self.base_url, &params).await?;
        Ok(self.selectors.parse_search_page(&html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_PAGE: &str = r#"
        <html><body>
        <div class="sds-comps-vertical-layout sds-comps-full-layout">
            <div class="sds-comps-profile-info-title"><span class="sds-comps-text-type-body2">AI Times</span></div>
            <span class="sds-comps-profile-info-subtext"><span class="sds-comps-text-type-body2">3 hours ago</span></span>
            <a class="_228e3bd1" href="https://press.example.com/1"><span class="sds-comps-text-type-headline1"> New model released </span></a>
            <a href="https://press.example.com/1">Original</a>
            <a href="https://n.news.naver.com/article/001/0001"> 네이버뉴스 </a>
        </div>
        <div class="sds-comps-vertical-layout sds-comps-full-layout">
            <a class="_228e3bd1" href="https://press.example.com/2"><span class="sds-comps-text-type-headline1">No portal copy</span></a>
        </div>
        <div class="sds-comps-vertical-layout sds-comps-full-layout">
            <a class="_228e3bd1"><span class="sds-comps-text-type-headline1">Broken anchor</span></a>
            <a>네이버뉴스</a>
        </div>
        <div class="sds-comps-vertical-layout sds-comps-full-layout">
            <a href="https://n.news.naver.com/article/002/0002">네이버뉴스</a>
        </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_search_page() {
        let selectors = NaverSelectors::new().unwrap();
        let items = selectors.parse_search_page(SEARCH_PAGE);
        assert_eq!(items.len(), 4);

        let first = items[0].as_ref().unwrap();
        assert_eq!(first.title, "New model released");
        assert_eq!(first.link.as_deref(), Some("https://n.news.naver.com/article/001/0001"));
        assert_eq!(first.press.as_deref(), Some("AI Times"));
        assert_eq!(first.date.as_deref(), Some("3 hours ago"));

        let second = items[1].as_ref().unwrap();
        assert_eq!(second.title, "No portal copy");
        assert_eq!(second.link, None);
        assert_eq!(second.press, None);
        assert_eq!(second.date, None);

        assert!(items[2].is_err());

        let untitled = items[3].as_ref().unwrap();
        assert!(untitled.title.is_empty());
        assert!(untitled.link.is_some());
    }

    #[test]
    fn test_parse_search_page_without_items() {
        let selectors = NaverSelectors::new().unwrap();
        assert!(selectors.parse_search_page("<html><body>no results</body></html>").is_empty());
    }

    #[test]
    fn test_parse_article_body() {
        let selectors = NaverSelectors::new().unwrap();
        let html = r#"<article id="dic_area">
            First paragraph.<br><br>
            <span>Second paragraph.</span>
            <em class="img_desc"> Caption </em>
        </article>"#;
        assert_eq!(
            selectors.parse_article_body(html).as_deref(),
            Some("First paragraph.\nSecond paragraph.\nCaption")
        );
        assert_eq!(selectors.parse_article_body("<div id=\"other\">x</div>"), None);
    }

    #[test]
    fn test_scraper_rejects_bad_base_url() {
        let config = CollectorConfig {
            base_url: "not a url".into(),
            ..CollectorConfig::default()
        };
        assert!(NaverScraper::new(&config).is_err());
        assert!(NaverScraper::new(&CollectorConfig::default()).is_ok());
    }

    async fn serve(router: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_content_parses_error_pages() {
        use axum::{http::StatusCode, response::Html as Page, routing::get, Router};

        let router = Router::new()
            .route(
                "/deleted",
                get(|| async {
                    (StatusCode::NOT_FOUND, Page(r#"<div id="dic_area">Deleted article notice</div>"#))
                }),
            )
            .route(
                "/missing",
                get(|| async { (StatusCode::NOT_FOUND, Page("<html><body>Not found</body></html>")) }),
            )
            .route(
                "/ok",
                get(|| async { Page(r#"<div id="dic_area"><p>Body</p></div>"#) }),
            );
        let base = serve(router).await;
        let scraper = NaverScraper::new(&CollectorConfig::default()).unwrap();

        assert_eq!(
            scraper.fetch_content(&format!("{}/deleted", base)).await,
            FetchOutcome::Content("Deleted article notice".into())
        );
        assert_eq!(
            scraper.fetch_content(&format!("{}/missing", base)).await,
            FetchOutcome::NoContent
        );
        assert_eq!(
            scraper.fetch_content(&format!("{}/ok", base)).await,
            FetchOutcome::Content("Body".into())
        );
    }

    #[tokio::test]
    async fn test_fetch_content_connection_error_fails() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let scraper = NaverScraper::new(&CollectorConfig::default()).unwrap();
        let outcome = scraper.fetch_content(&format!("http://{}/article", addr)).await;
        assert!(matches!(outcome, FetchOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn test_search_rejects_error_status() {
        use axum::{http::StatusCode, routing::get, Router};

        let router = Router::new().route("/search", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
        let config = CollectorConfig {
            base_url: format!("{}/search", serve(router).await),
            ..CollectorConfig::default()
        };
        let scraper = NaverScraper::new(&config).unwrap();
        assert!(scraper.search("AI").await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_content_invalid_link_degrades() {
        let scraper = NaverScraper::new(&CollectorConfig::default()).unwrap();
        let outcome = scraper.fetch_content("not-a-link").await;
        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        assert_eq!(outcome.into_content(), nd_core::FAILED_TO_LOAD);
    }
}
