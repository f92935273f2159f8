use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nd_core::{ArticleRecord, Error, InsightRecord, InsightStore, ObjectMeta, ObjectStore, Result, StoredInsight};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
    last_modified: DateTime<Utc>,
}

/// Object store kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<BTreeMap<String, StoredObject>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Like `put`, with an explicit modification time.
    pub async fn put_at(&self, key: &str, bytes: Vec<u8>, content_type: &str, at: DateTime<Utc>) {
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
                last_modified: at,
            },
        );
    }

    pub async fn content_type(&self, key: &str) -> Option<String> {
        self.objects.read().await.get(key).map(|o| o.content_type.clone())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn location(&self) -> String {
        "memory://".to_string()
    }

    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        self.put_at(key, bytes, content_type, Utc::now()).await;
        Ok(())
    }

    async fn put_new(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        match self.objects.write().await.entry(key.to_string()) {
            Entry::Occupied(_) => Err(Error::Storage(format!("object already exists: {}", key))),
            Entry::Vacant(slot) => {
                slot.insert(StoredObject {
                    bytes,
                    content_type: content_type.to_string(),
                    last_modified: Utc::now(),
                });
                Ok(())
            }
        }
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.objects
            .read()
            .await
            .get(key)
            .map(|o| o.bytes.clone())
            .ok_or_else(|| Error::Storage(format!("object not found: {}", key)))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>> {
        Ok(self
            .objects
            .read()
            .await
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, object)| ObjectMeta {
                key: key.clone(),
                size: object.bytes.len() as u64,
                last_modified: object.last_modified,
            })
            .collect())
    }
}

/// Insight sink kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryInsightStore {
    insights: RwLock<Vec<StoredInsight>>,
    articles: RwLock<Vec<(String, String)>>,
}

impl MemoryInsightStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored `(title, link)` rows in insertion order.
    pub async fn articles(&self) -> Vec<(String, String)> {
        self.articles.read().await.clone()
    }

    pub async fn insights(&self) -> Vec<StoredInsight> {
        self.insights.read().await.clone()
    }
}

#[async_trait]
impl InsightStore for MemoryInsightStore {
    async fn save_insight(&self, insight: &InsightRecord) -> Result<i64> {
        let mut insights = self.insights.write().await;
        let id = insights.len() as i64 + 1;
        insights.push(StoredInsight {
            id,
            record: insight.clone(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn save_articles(&self, articles: &[ArticleRecord]) -> Result<usize> {
        let mut rows = self.articles.write().await;
        rows.extend(articles.iter().map(|a| (a.title.clone(), a.link.clone())));
        Ok(articles.len())
    }

    async fn latest_insight(&self) -> Result<Option<StoredInsight>> {
        Ok(self.insights.read().await.last().cloned())
    }
}
