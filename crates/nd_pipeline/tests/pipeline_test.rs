use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use nd_core::config::DispatchConfig;
use nd_core::{Error, InsightStore, ObjectStore, PipelineStatus, Result};
use nd_inference::{Analyzer, DummyModel};
use nd_pipeline::{CommandRequest, DailyPipeline, Notification, Notifier, PipelineDispatcher, RemoteExecutor};
use nd_scrappers::scrapers::SourceMetadata;
use nd_scrappers::{Collector, ContentFetcher, FetchOutcome, Scraper, SearchItem};
use nd_storage::{DatasetWriter, FilesystemStore, MemoryInsightStore};

/// Two queries whose results overlap on one title.
struct FixtureScraper;

#[async_trait]
impl ContentFetcher for FixtureScraper {
    async fn fetch_content(&self, link: &str) -> FetchOutcome {
        if link.ends_with("/slow") {
            FetchOutcome::Failed("timed out".into())
        } else {
            FetchOutcome::Content(format!("Article body from {}", link))
        }
    }
}

#[async_trait]
impl Scraper for FixtureScraper {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata { name: "Fixture", emoji: "🧪" }
    }

    async fn search(&self, query: &str) -> Result<Vec<Result<SearchItem>>> {
        let hit = |title: &str, link: &str| {
            Ok(SearchItem {
                title: title.into(),
                link: Some(link.into()),
                press: Some("연합뉴스".into()),
                date: Some("1시간 전".into()),
            })
        };
        match query {
            "AI" => Ok(vec![hit("GPU shortage eases", "https://n.news/1"), hit("Agents ship", "https://n.news/slow")]),
            "LLM" => Ok(vec![hit("GPU shortage eases", "https://n.news/1b"), hit("Open weights", "https://n.news/3")]),
            _ => Err(Error::Scraping(format!("HTTP 503 for {}", query))),
        }
    }
}

#[derive(Default)]
struct CapturingExecutor {
    requests: Mutex<Vec<CommandRequest>>,
}

#[async_trait]
impl RemoteExecutor for CapturingExecutor {
    async fn send_command(&self, request: &CommandRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        Ok("cmd-0001".to_string())
    }
}

#[derive(Default)]
struct CapturingNotifier {
    sent: Mutex<Vec<Notification>>,
}

#[async_trait]
impl Notifier for CapturingNotifier {
    async fn publish(&self, notification: &Notification) -> Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Pulls the dataset key back out of `... --key '<key>'`.
fn key_argument(command: &str) -> Option<&str> {
    command.split_once("--key ")?.1.strip_prefix('\'')?.strip_suffix('\'')
}

#[tokio::test]
async fn test_daily_run_hands_its_dataset_to_the_analyzer() {
    let bucket = tempfile::tempdir().unwrap();
    let store = Arc::new(FilesystemStore::new(bucket.path()));
    let executor = Arc::new(CapturingExecutor::default());
    let notifier = Arc::new(CapturingNotifier::default());

    let pipeline = DailyPipeline::new(
        Collector::new(Arc::new(FixtureScraper), vec!["AI".into(), "Robotics".into(), "LLM".into()]),
        DatasetWriter::new(store.clone(), "raw/", "NaverNews_AITrends"),
        PipelineDispatcher::new(executor.clone(), notifier.clone(), DispatchConfig::default()),
    );

    let now = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
    let response = pipeline.run(now).await.unwrap();

    let key = "raw/NaverNews_AITrends_20240309_070501.csv";
    assert_eq!(response.status_code, 200);
    assert_eq!(response.body.message, "success");
    assert_eq!(response.body.status, PipelineStatus::Success);
    assert_eq!(response.body.s3_key, key);
    assert_eq!(response.body.command_id, "cmd-0001");

    let listed = store.list("raw/").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].key, key);

    let sent = notifier.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].message.contains(key));

    let command = executor.requests.lock().unwrap()[0].commands[0].clone();
    assert_eq!(key_argument(&command), Some(key));

    // The analyzer side of the hand-off reads exactly that dataset
    let insights = Arc::new(MemoryInsightStore::new());
    let analyzer = Analyzer::new(store, insights.clone(), Arc::new(DummyModel::new()), "raw/");
    let report = analyzer.run(key_argument(&command)).await.unwrap();
    assert_eq!(report.key, key);
    assert_eq!(report.articles, 3);

    let articles = insights.articles().await;
    assert_eq!(
        articles,
        vec![
            ("GPU shortage eases".to_string(), "https://n.news/1b".to_string()),
            ("Agents ship".to_string(), "https://n.news/slow".to_string()),
            ("Open weights".to_string(), "https://n.news/3".to_string()),
        ]
    );
    let latest = insights.latest_insight().await.unwrap().unwrap();
    assert!(latest.record.summary.starts_with("Article body from https://n.news/1"));
}

#[tokio::test]
async fn test_empty_day_still_stages_and_dispatches() {
    struct Silent;

    #[async_trait]
    impl ContentFetcher for Silent {
        async fn fetch_content(&self, _link: &str) -> FetchOutcome {
            FetchOutcome::NoContent
        }
    }

    #[async_trait]
    impl Scraper for Silent {
        fn source_metadata(&self) -> SourceMetadata {
            SourceMetadata { name: "Silent", emoji: "🔇" }
        }

        async fn search(&self, _query: &str) -> Result<Vec<Result<SearchItem>>> {
            Ok(Vec::new())
        }
    }

    let bucket = tempfile::tempdir().unwrap();
    let store = Arc::new(FilesystemStore::new(bucket.path()));
    let notifier = Arc::new(CapturingNotifier::default());
    let pipeline = DailyPipeline::new(
        Collector::new(Arc::new(Silent), vec!["AI".into()]),
        DatasetWriter::new(store.clone(), "raw/", "NaverNews_AITrends"),
        PipelineDispatcher::new(Arc::new(CapturingExecutor::default()), notifier.clone(), DispatchConfig::default()),
    );

    let response = pipeline.run(Utc::now()).await.unwrap();
    assert_eq!(response.status_code, 200);

    let bytes = store.get(&response.body.s3_key).await.unwrap();
    assert!(nd_storage::decode_csv(&bytes).unwrap().is_empty());
    assert_eq!(notifier.sent.lock().unwrap().len(), 1);
}
