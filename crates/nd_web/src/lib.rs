use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/runs", post(handlers::run_pipeline))
        .route("/api/insights/latest", get(handlers::latest_insight))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

pub async fn serve(addr: SocketAddr, state: AppState) -> nd_core::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🌐 Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, create_app(state)).await?;
    Ok(())
}

pub mod prelude {
    pub use crate::{create_app, serve, AppState};
    pub use nd_core::{Error, Result};
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use nd_core::config::DispatchConfig;
    use nd_core::{Error, InsightRecord, InsightStore, Result};
    use nd_pipeline::{CommandRequest, DailyPipeline, NoopNotifier, PipelineDispatcher, RemoteExecutor};
    use nd_scrappers::scrapers::SourceMetadata;
    use nd_scrappers::{Collector, ContentFetcher, FetchOutcome, Scraper, SearchItem};
    use nd_storage::{DatasetWriter, MemoryInsightStore, MemoryObjectStore};
    use serde_json::Value;
    use tower::ServiceExt;

    struct OneHit;

    #[async_trait]
    impl ContentFetcher for OneHit {
        async fn fetch_content(&self, _link: &str) -> FetchOutcome {
            FetchOutcome::Content("body".into())
        }
    }

    #[async_trait]
    impl Scraper for OneHit {
        fn source_metadata(&self) -> SourceMetadata {
            SourceMetadata { name: "OneHit", emoji: "🧪" }
        }

        async fn search(&self, _query: &str) -> Result<Vec<Result<SearchItem>>> {
            Ok(vec![Ok(SearchItem {
                title: "LLM news".into(),
                link: Some("https://n.news/1".into()),
                ..SearchItem::default()
            })])
        }
    }

    struct Executor(bool);

    #[async_trait]
    impl RemoteExecutor for Executor {
        async fn send_command(&self, _request: &CommandRequest) -> Result<String> {
            if self.0 {
                Ok("cmd-9".into())
            } else {
                Err(Error::Dispatch("no instances match tag:Role".into()))
            }
        }
    }

    fn app(executor_ok: bool, insights: Arc<MemoryInsightStore>) -> Router {
        let pipeline = DailyPipeline::new(
            Collector::new(Arc::new(OneHit), vec!["AI".into()]),
            DatasetWriter::new(Arc::new(MemoryObjectStore::new()), "raw/", "NaverNews_AITrends"),
            PipelineDispatcher::new(
                Arc::new(Executor(executor_ok)),
                Arc::new(NoopNotifier),
                DispatchConfig::default(),
            ),
        );
        create_app(AppState {
            pipeline: Arc::new(pipeline),
            insights,
        })
    }

    async fn call(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = call(app(true, Arc::new(MemoryInsightStore::new())), "GET", "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_run_returns_pipeline_response() {
        let (status, body) = call(app(true, Arc::new(MemoryInsightStore::new())), "POST", "/api/runs").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["statusCode"], 200);
        assert_eq!(body["body"]["message"], "success");
        assert_eq!(body["body"]["command_id"], "cmd-9");
        assert!(body["body"]["s3_key"]
            .as_str()
            .unwrap()
            .starts_with("raw/NaverNews_AITrends_"));
    }

    #[tokio::test]
    async fn test_run_failure_is_500() {
        let (status, body) = call(app(false, Arc::new(MemoryInsightStore::new())), "POST", "/api/runs").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "failure");
        assert!(body["error"].as_str().unwrap().contains("no instances match"));
    }

    #[tokio::test]
    async fn test_latest_insight() {
        let insights = Arc::new(MemoryInsightStore::new());
        let (status, _) = call(app(true, insights.clone()), "GET", "/api/insights/latest").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        insights
            .save_insight(&InsightRecord {
                summary: "Agents go mainstream.".into(),
                keywords: "AI, agents, GPU, cloud, LLM".into(),
                insight: "Long form.".into(),
            })
            .await
            .unwrap();
        let (status, body) = call(app(true, insights), "GET", "/api/insights/latest").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 1);
        assert_eq!(body["summary"], "Agents go mainstream.");
    }
}
