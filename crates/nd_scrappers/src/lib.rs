pub mod cli;
pub mod collector;
pub mod dedup;
pub mod scrapers;

pub use cli::{handle_command, ScraperArgs, ScraperCommands};
pub use collector::{CollectionReport, Collector};
pub use dedup::{DedupOutcome, Deduplicator, SkipReason};
pub use scrapers::{ContentFetcher, FetchOutcome, NaverScraper, Scraper, SearchItem};

pub mod prelude {
    pub use super::scrapers::{ContentFetcher, Scraper};
    pub use nd_core::{ArticleRecord, Error, Result};
}
