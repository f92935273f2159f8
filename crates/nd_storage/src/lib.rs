use std::sync::Arc;

use nd_core::config::DatasetConfig;
use nd_core::{Error, InsightStore, ObjectStore, Result};

pub mod backends;
pub mod dataset;

pub use backends::*;
pub use dataset::{dataset_key, decode_csv, encode_csv, load_dataset, DatasetWriter};

pub const MEMORY_URL: &str = "memory://";

/// Builds the object store named by the dataset config. A bucket of
/// `memory://` keeps objects in process; anything else is a directory.
pub fn create_object_store(config: &DatasetConfig) -> Arc<dyn ObjectStore> {
    if config.bucket.as_os_str() == MEMORY_URL {
        Arc::new(MemoryObjectStore::new())
    } else {
        Arc::new(FilesystemStore::new(config.bucket.clone()))
    }
}

/// Opens the relational sink behind `database_url` (`sqlite:...` or `memory://`).
pub async fn create_insight_store(database_url: &str) -> Result<Arc<dyn InsightStore>> {
    if database_url == MEMORY_URL {
        return Ok(Arc::new(MemoryInsightStore::new()));
    }
    #[cfg(feature = "sqlite")]
    {
        if database_url.starts_with("sqlite:") {
            return Ok(Arc::new(SqliteInsightStore::connect(database_url).await?));
        }
    }
    Err(Error::Config(format!("Unsupported database url: {}", database_url)))
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::dataset::DatasetWriter;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_insight_store() {
        assert!(create_insight_store(MEMORY_URL).await.is_ok());
        assert!(create_insight_store("postgres://db/insights").await.is_err());

        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("x.db").display());
        assert!(create_insight_store(&url).await.is_ok());
    }

    #[test]
    fn test_create_object_store() {
        let memory = DatasetConfig {
            bucket: MEMORY_URL.into(),
            ..DatasetConfig::default()
        };
        assert_eq!(create_object_store(&memory).location(), "memory://");
        assert!(create_object_store(&DatasetConfig::default())
            .location()
            .starts_with("file://"));
    }
}
