use std::collections::HashMap;

use nd_core::ArticleRecord;

use crate::scrapers::{ContentFetcher, SearchItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyTitle,
    MissingLink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupOutcome {
    /// First sighting of the title; content was fetched
    Inserted { index: usize },
    /// Repeat sighting that carried a new link
    LinkRefreshed { index: usize },
    /// Repeat sighting with no usable or no different link
    Unchanged { index: usize },
    Skipped(SkipReason),
}

/// Merges search hits across query passes keyed by title.
///
/// The first sighting of a title fixes its content, press and date. Later
/// sightings only replace the link, so a more canonical result can correct
/// the inbound URL without paying for another content fetch. Records keep
/// first-seen order.
#[derive(Debug, Default)]
pub struct Deduplicator {
    index: HashMap<String, usize>,
    records: Vec<ArticleRecord>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.index.contains_key(title.trim())
    }

    pub fn records(&self) -> &[ArticleRecord] {
        &self.records
    }

    pub async fn offer<F>(&mut self, item: SearchItem, fetcher: &F) -> DedupOutcome
    where
        F: ContentFetcher + ?Sized,
    {
        let title = item.title.trim();
        if title.is_empty() {
            return DedupOutcome::Skipped(SkipReason::EmptyTitle);
        }
        let link = item.link.filter(|l| !l.trim().is_empty());

        if let Some(&index) = self.index.get(title) {
            let record = &mut self.records[index];
            return match link {
                Some(link) if link != record.link => {
                    record.link = link;
                    DedupOutcome::LinkRefreshed { index }
                }
                _ => DedupOutcome::Unchanged { index },
            };
        }

        // A title without a link is never registered, so a later sighting
        // that does carry one can still create the record.
        let Some(link) = link else {
            return DedupOutcome::Skipped(SkipReason::MissingLink);
        };

        let content = fetcher.fetch_content(&link).await.into_content();
        let index = self.records.len();
        self.records.push(ArticleRecord::new(title, link, content, item.press, item.date));
        self.index.insert(title.to_string(), index);
        DedupOutcome::Inserted { index }
    }

    pub fn into_records(self) -> Vec<ArticleRecord> {
        self.records
    }
}
