use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// TOML-backed pipeline configuration. Every section falls back to the
/// production defaults, so an empty file is a valid config.
/// Secrets (API keys, webhook and database URLs) come from the environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub collector: CollectorConfig,
    pub dataset: DatasetConfig,
    pub dispatch: DispatchConfig,
    pub analyzer: AnalyzerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub queries: Vec<String>,
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            queries: ["AI", "Artificial Intelligence", "LLM", "AI Cloud", "Autonomous Driving"]
                .into_iter()
                .map(String::from)
                .collect(),
            base_url: "https://search.naver.com/search.naver".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Root directory of the filesystem object store
    pub bucket: PathBuf,
    pub prefix: String,
    pub name: String,
    /// Keep a copy of every staged CSV here as well
    pub local_copy_dir: Option<PathBuf>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            bucket: PathBuf::from("my-ai-daily-insights-s3"),
            prefix: "raw/".to_string(),
            name: "NaverNews_AITrends".to_string(),
            local_copy_dir: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutorKind {
    Local,
    Http,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    Log,
    Webhook,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub target_tag_key: String,
    pub target_tag_value: String,
    pub document: String,
    pub analyzer_command: String,
    pub log_group: String,
    pub executor: ExecutorKind,
    pub executor_url: Option<String>,
    pub notifier: NotifierKind,
    pub webhook_url: Option<String>,
    pub topic: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            target_tag_key: "Role".to_string(),
            target_tag_value: "nlp-analyzer".to_string(),
            document: "AWS-RunShellScript".to_string(),
            analyzer_command: "nd analyze".to_string(),
            log_group: "/app-ec2/nlp-analyzer/logs".to_string(),
            executor: ExecutorKind::Local,
            executor_url: None,
            notifier: NotifierKind::Log,
            webhook_url: None,
            topic: "ai-daily-insights-alert".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    OpenAi,
    Dummy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub backend: ModelBackend,
    pub model: String,
    pub api_base: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub database_url: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::OpenAi,
            model: "o3-mini".to_string(),
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: None,
            database_url: "sqlite:insights.db".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Overlay secrets and env-specific values from the process environment.
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.analyzer.api_key = Some(key);
        }
        if let Some(url) = lookup("ND_DATABASE_URL") {
            self.analyzer.database_url = url;
        }
        if let Some(url) = lookup("ND_WEBHOOK_URL") {
            self.dispatch.webhook_url = Some(url);
        }
        if let Some(url) = lookup("ND_EXECUTOR_URL") {
            self.dispatch.executor_url = Some(url);
        }
        if let Some(bucket) = lookup("ND_BUCKET") {
            self.dataset.bucket = PathBuf::from(bucket);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.collector.queries.iter().all(|q| q.trim().is_empty()) {
            return Err(Error::Config("collector.queries must name at least one topic".into()));
        }
        url::Url::parse(&self.collector.base_url)
            .map_err(|e| Error::InvalidUrl(format!("collector.base_url: {}", e)))?;
        if self.dispatch.executor == ExecutorKind::Http && self.dispatch.executor_url.is_none() {
            return Err(Error::Config("dispatch.executor = \"http\" requires executor_url".into()));
        }
        if self.dispatch.notifier == NotifierKind::Webhook && self.dispatch.webhook_url.is_none() {
            return Err(Error::Config("dispatch.notifier = \"webhook\" requires webhook_url".into()));
        }
        Ok(())
    }
}
