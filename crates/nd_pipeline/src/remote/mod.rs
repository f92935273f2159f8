use async_trait::async_trait;
use nd_core::config::DispatchConfig;
use nd_core::Result;
use serde::{Deserialize, Serialize};

pub mod http;
pub mod local;

pub use http::HttpExecutor;
pub use local::LocalExecutor;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandTarget {
    pub key: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub enabled: bool,
    pub log_group: String,
}

/// A shell command addressed to every host carrying a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub targets: Vec<CommandTarget>,
    pub document: String,
    pub commands: Vec<String>,
    pub output: OutputConfig,
}

impl CommandRequest {
    /// Asks the analyzer hosts to process the dataset staged under `key`.
    pub fn for_analyzer(config: &DispatchConfig, key: &str) -> Self {
        Self {
            targets: vec![CommandTarget {
                key: format!("tag:{}", config.target_tag_key),
                values: vec![config.target_tag_value.clone()],
            }],
            document: config.document.clone(),
            commands: vec![format!("{} --key {}", config.analyzer_command, shell_quote(key))],
            output: OutputConfig {
                enabled: true,
                log_group: config.log_group.clone(),
            },
        }
    }

    /// Commands joined into one shell line.
    pub fn script(&self) -> String {
        self.commands.join(" && ")
    }
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Fire-and-forget remote execution. Returns the command id; completion is
/// never observed.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    async fn send_command(&self, request: &CommandRequest) -> Result<String>;
}
