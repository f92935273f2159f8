use async_trait::async_trait;
use crate::types::{ArticleRecord, InsightRecord, ObjectMeta, StoredInsight};
use crate::Result;

/// Key/value blob storage for staged datasets.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Human readable location of the store, e.g. a bucket directory
    fn location(&self) -> String;

    /// Write an object, replacing any existing one with the same key
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()>;

    /// Write an object only if the key is free. An existing object is left
    /// untouched and `Error::Storage` is returned.
    async fn put_new(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()>;

    /// Read a whole object
    async fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// List objects whose key starts with `prefix`
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>>;

    /// The most recently modified object under `prefix`, ties broken by key
    async fn latest(&self, prefix: &str) -> Result<Option<ObjectMeta>> {
        let objects = self.list(prefix).await?;
        Ok(objects
            .into_iter()
            .max_by(|a, b| a.last_modified.cmp(&b.last_modified).then_with(|| a.key.cmp(&b.key))))
    }
}

/// Relational sink read by the dashboards.
#[async_trait]
pub trait InsightStore: Send + Sync {
    /// Store one generated insight row
    async fn save_insight(&self, insight: &InsightRecord) -> Result<i64>;

    /// Store a `(title, link)` row for every article
    async fn save_articles(&self, articles: &[ArticleRecord]) -> Result<usize>;

    /// The most recently stored insight, if any
    async fn latest_insight(&self) -> Result<Option<StoredInsight>>;
}
