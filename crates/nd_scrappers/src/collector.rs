use std::sync::Arc;

use nd_core::ArticleRecord;
use tracing::{error, info, warn};

use crate::dedup::{DedupOutcome, Deduplicator};
use crate::scrapers::Scraper;

/// Outcome of one full collection pass over every query.
#[derive(Debug, Default)]
pub struct CollectionReport {
    pub records: Vec<ArticleRecord>,
    pub queries_failed: usize,
    pub items_failed: usize,
    pub items_skipped: usize,
    pub links_refreshed: usize,
}

/// Runs one search per topic query and folds every hit into a
/// [`Deduplicator`]. Failures are logged and skipped, never raised.
pub struct Collector {
    scraper: Arc<dyn Scraper>,
    queries: Vec<String>,
}

impl Collector {
    pub fn new(scraper: Arc<dyn Scraper>, queries: Vec<String>) -> Self {
        Self { scraper, queries }
    }

    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    pub async fn collect(&self) -> CollectionReport {
        let meta = self.scraper.source_metadata();
        info!("{} Starting multi-keyword crawl of {} ({} queries)", meta.emoji, meta.name, self.queries.len());

        let mut dedup = Deduplicator::new();
        let mut report = CollectionReport::default();

        for query in &self.queries {
            info!("--- Searching [{}] ---", query);

            let items = match self.scraper.search(query).await {
                Ok(items) => items,
                Err(e) => {
                    error!("Request error for [{}]: {}", query, e);
                    report.queries_failed += 1;
                    continue;
                }
            };

            for item in items {
                let item = match item {
                    Ok(item) => item,
                    Err(e) => {
                        warn!("Error parsing item: {}", e);
                        report.items_failed += 1;
                        continue;
                    }
                };

                match dedup.offer(item, self.scraper.as_ref()).await {
                    DedupOutcome::Inserted { index } => {
                        info!("Collected: {}", dedup.records()[index].title);
                    }
                    DedupOutcome::LinkRefreshed { index } => {
                        tracing::debug!("Refreshed link for: {}", dedup.records()[index].title);
                        report.links_refreshed += 1;
                    }
                    DedupOutcome::Unchanged { .. } => {}
                    DedupOutcome::Skipped(reason) => {
                        tracing::debug!("Skipped item: {:?}", reason);
                        report.items_skipped += 1;
                    }
                }
            }
        }

        report.records = dedup.into_records();
        info!(
            "Crawl finished: {} unique articles, {} failed queries, {} failed items",
            report.records.len(),
            report.queries_failed,
            report.items_failed
        );
        report
    }
}
