use std::sync::Arc;

use clap::{Args, Subcommand};
use nd_core::config::CollectorConfig;
use nd_core::Result;

use crate::collector::Collector;
use crate::scrapers::{NaverScraper, Scraper};

#[derive(Args, Debug, Clone)]
pub struct ScraperArgs {
    #[command(subcommand)]
    pub command: ScraperCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ScraperCommands {
    /// Crawl and deduplicate without staging anything
    Preview {
        /// Topic queries; defaults to the configured list
        queries: Vec<String>,
    },
    /// List available scrapers
    List,
}

pub async fn handle_command(args: ScraperArgs, config: &CollectorConfig) -> Result<()> {
    let scraper = Arc::new(NaverScraper::new(config)?);
    match args.command {
        ScraperCommands::Preview { queries } => {
            let queries = if queries.is_empty() { config.queries.clone() } else { queries };
            let report = Collector::new(scraper.clone(), queries).collect().await;
            let emoji = scraper.source_metadata().emoji;
            for record in &report.records {
                println!("{} {} - {} ({}, {})", emoji, record.title, record.link, record.press, record.date);
            }
            println!(
                "{} articles, {} failed queries, {} failed items",
                report.records.len(),
                report.queries_failed,
                report.items_failed
            );
        }
        ScraperCommands::List => {
            let meta = scraper.source_metadata();
            println!("Available scrapers:");
            println!("  {} {} ({})", meta.emoji, meta.name, scraper.cli_names().join(", "));
        }
    }
    Ok(())
}
