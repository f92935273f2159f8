use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use nd_cli::logging::init_logging;
use nd_core::PipelineConfig;
use nd_inference::{create_model, Analyzer};
use nd_scrappers::cli::{handle_command, ScraperArgs};
use nd_web::AppState;
use tracing::info;

const DEFAULT_CONFIG_FILE: &str = "nd.toml";

#[derive(Parser, Debug)]
#[command(author, version, about = "Daily news digest pipeline", long_about = None)]
pub struct Cli {
    /// TOML config file; `nd.toml` is used when present
    #[arg(long, global = true, env = "ND_CONFIG")]
    config: Option<PathBuf>,
    /// Object store root directory, overrides `dataset.bucket`
    #[arg(long, global = true)]
    bucket: Option<PathBuf>,
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Crawl, stage the dataset, trigger the analyzer and notify
    Collect,
    /// Summarize one staged dataset and store the insight
    Analyze {
        /// Dataset key; defaults to the most recently staged one
        #[arg(long)]
        key: Option<String>,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
    /// Print the effective configuration
    Config,
    /// Inspect the search source without staging anything
    Scrape(ScraperArgs),
}

fn load_config(cli: &Cli) -> anyhow::Result<PipelineConfig> {
    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => PipelineConfig::load(Path::new(DEFAULT_CONFIG_FILE))?,
        None => PipelineConfig::default(),
    };
    let mut config = config.with_env();
    if let Some(bucket) = &cli.bucket {
        config.dataset.bucket = bucket.clone();
    }
    config.validate()?;
    Ok(config)
}

async fn analyze(config: &PipelineConfig, key: Option<&str>) -> anyhow::Result<()> {
    let store = nd_storage::create_object_store(&config.dataset);
    let insights = nd_storage::create_insight_store(&config.analyzer.database_url)
        .await
        .context("opening insight store")?;
    let model = create_model(&config.analyzer)?;
    info!("🧠 Using model {}", model.name());

    let analyzer = Analyzer::new(store, insights, model, config.dataset.prefix.clone());
    let report = analyzer.run(key).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.json_logs);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Collect => {
            let pipeline = nd_pipeline::create_pipeline(&config)?;
            let response = pipeline.run(Utc::now()).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Analyze { key } => analyze(&config, key.as_deref()).await?,
        Commands::Serve { addr } => {
            let state = AppState {
                pipeline: std::sync::Arc::new(nd_pipeline::create_pipeline(&config)?),
                insights: nd_storage::create_insight_store(&config.analyzer.database_url).await?,
            };
            nd_web::serve(addr, state).await?;
        }
        Commands::Config => print!("{}", config.to_toml()?),
        Commands::Scrape(args) => handle_command(args, &config.collector).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["nd", "analyze", "--key", "raw/a.csv"]).unwrap();
        assert!(matches!(cli.command, Commands::Analyze { key: Some(ref k) } if k == "raw/a.csv"));

        let cli = Cli::try_parse_from(["nd", "--json-logs", "serve", "--addr", "0.0.0.0:8080"]).unwrap();
        assert!(cli.json_logs);
        assert!(matches!(cli.command, Commands::Serve { addr } if addr.port() == 8080));

        let cli = Cli::try_parse_from(["nd", "scrape", "preview", "LLM", "AI Cloud"]).unwrap();
        assert!(matches!(cli.command, Commands::Scrape(_)));

        assert!(Cli::try_parse_from(["nd"]).is_err());
    }

    #[test]
    fn test_load_config_applies_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nd.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[collector]\nqueries = [\"Robotics\"]").unwrap();

        let cli = Cli::try_parse_from([
            "nd",
            "--config",
            path.to_str().unwrap(),
            "--bucket",
            "/tmp/nd-bucket",
            "config",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.collector.queries, vec!["Robotics"]);
        assert_eq!(config.dataset.bucket, PathBuf::from("/tmp/nd-bucket"));
    }
}
