use std::sync::Arc;

use chrono::Utc;
use nd_core::config::DispatchConfig;
use nd_core::{Error, PipelineRun, PipelineStatus, Result, RunStage, StagedDataset};
use tracing::{error, info, warn};

use crate::notify::{Notification, Notifier};
use crate::remote::{CommandRequest, RemoteExecutor};

/// Hands a staged dataset to the analyzer hosts and reports the outcome.
pub struct PipelineDispatcher {
    executor: Arc<dyn RemoteExecutor>,
    notifier: Arc<dyn Notifier>,
    config: DispatchConfig,
}

impl PipelineDispatcher {
    pub fn new(executor: Arc<dyn RemoteExecutor>, notifier: Arc<dyn Notifier>, config: DispatchConfig) -> Self {
        Self {
            executor,
            notifier,
            config,
        }
    }

    /// Moves `run` from `Staged` through `Dispatched` to `Notified`.
    ///
    /// Exactly one notification goes out per call. When the command cannot
    /// be sent, a FAILURE notification is attempted and the send error is
    /// returned; a failure to deliver that notification is only logged.
    pub async fn dispatch(&self, staged: &StagedDataset, run: &mut PipelineRun) -> Result<()> {
        if run.stage != RunStage::Staged {
            return Err(Error::StageTransition {
                from: run.stage.to_string(),
                to: RunStage::Dispatched.to_string(),
            });
        }
        let request = CommandRequest::for_analyzer(&self.config, &staged.key);
        info!(
            "Triggering remote command for hosts tagged {}={}",
            self.config.target_tag_key, self.config.target_tag_value
        );

        let command_id = match self.executor.send_command(&request).await {
            Ok(id) => id,
            Err(e) => {
                error!("Remote command failed for {}: {}", staged.key, e);
                run.fail();
                let notification =
                    Notification::for_run(PipelineStatus::Failure, &staged.key, None, Utc::now());
                if let Err(notify_err) = self.notifier.publish(&notification).await {
                    warn!("Failed to send failure notification: {}", notify_err);
                }
                return Err(e);
            }
        };

        run.mark_dispatched(command_id.as_str())?;
        info!("RunCommand triggered. CommandId = {}", command_id);

        let notification =
            Notification::for_run(run.status, &staged.key, Some(&command_id), Utc::now());
        self.notifier.publish(&notification).await?;
        run.mark_notified()?;
        Ok(())
    }
}
