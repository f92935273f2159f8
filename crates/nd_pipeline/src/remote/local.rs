use std::process::Stdio;

use async_trait::async_trait;
use nd_core::{Error, Result};
use tokio::process::Command;
use tracing::info;
use uuid::Uuid;

use super::{CommandRequest, RemoteExecutor};

/// Runs the command on this machine with `sh -c`. The child is spawned and
/// left running; its exit status is never collected here.
#[derive(Debug, Default)]
pub struct LocalExecutor;

impl LocalExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RemoteExecutor for LocalExecutor {
    async fn send_command(&self, request: &CommandRequest) -> Result<String> {
        let script = request.script();
        let command_id = Uuid::new_v4().to_string();

        Command::new("sh")
            .arg("-c")
            .arg(&script)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| Error::Dispatch(format!("failed to spawn {:?}: {}", script, e)))?;

        info!(command_id = %command_id, document = %request.document, "Spawned local command: {}", script);
        if request.output.enabled {
            info!("Command output goes to this process's log ({})", request.output.log_group);
        }
        Ok(command_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{CommandTarget, OutputConfig};
    use std::time::Duration;

    fn request(command: String) -> CommandRequest {
        CommandRequest {
            targets: vec![CommandTarget {
                key: "tag:Role".into(),
                values: vec!["local".into()],
            }],
            document: "AWS-RunShellScript".into(),
            commands: vec![command],
            output: OutputConfig {
                enabled: false,
                log_group: String::new(),
            },
        }
    }

    #[tokio::test]
    async fn test_spawns_without_waiting() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("ran");
        let executor = LocalExecutor::new();

        let id = executor
            .send_command(&request(format!("touch '{}'", marker.display())))
            .await
            .unwrap();
        assert!(Uuid::parse_str(&id).is_ok());

        for _ in 0..50 {
            if marker.exists() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(marker.exists());
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let executor = LocalExecutor::new();
        let a = executor.send_command(&request("true".into())).await.unwrap();
        let b = executor.send_command(&request("true".into())).await.unwrap();
        assert_ne!(a, b);
    }
}
