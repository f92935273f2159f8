use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use nd_core::config::DatasetConfig;
use nd_core::{ArticleRecord, Error, ObjectStore, Result, StagedDataset};
use tracing::info;

pub const DATASET_HEADER: [&str; 5] = ["title", "link", "content", "press", "date"];
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn run_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// `<prefix><name>_<YYYYMMDD_HHMMSS>.csv`; a non-empty prefix always ends in `/`.
pub fn dataset_key(prefix: &str, name: &str, now: DateTime<Utc>) -> String {
    let prefix = prefix.trim_matches('/');
    let stamp = run_timestamp(now);
    if prefix.is_empty() {
        format!("{}_{}.csv", name, stamp)
    } else {
        format!("{}/{}_{}.csv", prefix, name, stamp)
    }
}

/// BOM-prefixed UTF-8 CSV with the fixed header, even for an empty dataset.
pub fn encode_csv(records: &[ArticleRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(UTF8_BOM.to_vec());
    writer.write_record(DATASET_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.into_inner().map_err(|e| Error::Io(e.into_error()))
}

pub fn decode_csv(bytes: &[u8]) -> Result<Vec<ArticleRecord>> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(bytes);

    let headers = reader.headers()?.clone();
    for column in &DATASET_HEADER[..3] {
        if !headers.iter().any(|h| h == *column) {
            return Err(Error::Storage(format!("dataset is missing the {} column", column)));
        }
    }

    reader
        .deserialize::<ArticleRecord>()
        .map(|row| row.map(ArticleRecord::with_defaults).map_err(Error::from))
        .collect()
}

pub async fn load_dataset(store: &dyn ObjectStore, key: &str) -> Result<Vec<ArticleRecord>> {
    let bytes = store.get(key).await?;
    decode_csv(&bytes)
}

/// Serializes a finished collection run and stages it in object storage.
pub struct DatasetWriter {
    store: Arc<dyn ObjectStore>,
    prefix: String,
    name: String,
    local_copy_dir: Option<PathBuf>,
}

impl DatasetWriter {
    pub fn new(store: Arc<dyn ObjectStore>, prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            name: name.into(),
            local_copy_dir: None,
        }
    }

    pub fn from_config(store: Arc<dyn ObjectStore>, config: &DatasetConfig) -> Self {
        Self {
            local_copy_dir: config.local_copy_dir.clone(),
            ..Self::new(store, config.prefix.clone(), config.name.clone())
        }
    }

    pub fn key_for(&self, now: DateTime<Utc>) -> String {
        dataset_key(&self.prefix, &self.name, now)
    }

    /// Upload failures propagate; nothing is retried here. A key that is
    /// already taken is refused so a staged dataset is never rewritten.
    pub async fn stage(&self, records: &[ArticleRecord], now: DateTime<Utc>) -> Result<StagedDataset> {
        let key = self.key_for(now);
        let bytes = encode_csv(records)?;

        self.store.put_new(&key, bytes.clone(), CSV_CONTENT_TYPE).await?;

        if let Some(dir) = &self.local_copy_dir {
            let file_name = key.rsplit('/').next().unwrap_or(&key);
            let path = dir.join(file_name);
            tokio::fs::create_dir_all(dir).await?;
            tokio::fs::write(&path, &bytes).await?;
            info!("Local CSV saved: {}", path.display());
        }

        let location = self.store.location();
        let uri = if location.ends_with('/') {
            format!("{}{}", location, key)
        } else {
            format!("{}/{}", location, key)
        };
        info!("Uploaded {} rows to {}", records.len(), uri);

        Ok(StagedDataset {
            key,
            rows: records.len(),
            uri,
        })
    }
}
