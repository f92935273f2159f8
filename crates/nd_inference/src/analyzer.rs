use std::fmt;
use std::sync::Arc;

use nd_core::{ArticleRecord, Error, InferenceModel, InsightRecord, InsightStore, ObjectStore, Result};
use nd_storage::load_dataset;
use serde::Serialize;
use tracing::info;

use crate::prompts;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub key: String,
    pub articles: usize,
    pub insight: InsightRecord,
}

/// Turns one staged dataset into a daily insight and persists it.
pub struct Analyzer {
    store: Arc<dyn ObjectStore>,
    insights: Arc<dyn InsightStore>,
    model: Arc<dyn InferenceModel>,
    prefix: String,
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analyzer")
            .field("model", &self.model)
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl Analyzer {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        insights: Arc<dyn InsightStore>,
        model: Arc<dyn InferenceModel>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            insights,
            model,
            prefix: prefix.into(),
        }
    }

    /// An explicit key wins. Without one, fall back to the most recently
    /// modified object under the prefix.
    pub async fn resolve_key(&self, key: Option<&str>) -> Result<String> {
        if let Some(key) = key.map(str::trim).filter(|k| !k.is_empty()) {
            return Ok(key.to_string());
        }
        self.store
            .latest(&self.prefix)
            .await?
            .map(|object| object.key)
            .ok_or_else(|| Error::Storage(format!("no dataset found under {:?}", self.prefix)))
    }

    pub async fn run(&self, key: Option<&str>) -> Result<AnalysisReport> {
        let key = self.resolve_key(key).await?;
        info!("Loading dataset {}", key);
        let articles = load_dataset(self.store.as_ref(), &key).await?;
        info!("Loaded {} articles", articles.len());

        let insight = self.generate(&combined_text(&articles)).await?;
        info!("Summary: {}", insight.summary);
        info!("Keywords: {}", insight.keywords);

        let id = self.insights.save_insight(&insight).await?;
        let saved = self.insights.save_articles(&articles).await?;
        info!("Stored insight {} and {} articles", id, saved);

        Ok(AnalysisReport {
            key,
            articles: saved,
            insight,
        })
    }

    async fn generate(&self, big_text: &str) -> Result<InsightRecord> {
        let summary = self.ask(prompts::summary(big_text)).await?;
        let keywords = self.ask(prompts::keywords(big_text)).await?;
        let insight = self.ask(prompts::insight(big_text)).await?;
        Ok(InsightRecord {
            summary,
            keywords,
            insight,
        })
    }

    async fn ask(&self, prompt: nd_core::Prompt) -> Result<String> {
        let response = self.model.generate(&prompt).await?;
        Ok(response.trim().to_string())
    }
}

pub fn combined_text(articles: &[ArticleRecord]) -> String {
    articles
        .iter()
        .map(|a| a.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
