use chrono::{DateTime, Utc};
use nd_core::{PipelineResponse, PipelineRun, Result};
use nd_scrappers::Collector;
use nd_storage::DatasetWriter;
use tracing::info;

use crate::dispatcher::PipelineDispatcher;

/// One scheduled collector run: collect, stage, dispatch, notify.
pub struct DailyPipeline {
    collector: Collector,
    writer: DatasetWriter,
    dispatcher: PipelineDispatcher,
}

impl DailyPipeline {
    pub fn new(collector: Collector, writer: DatasetWriter, dispatcher: PipelineDispatcher) -> Self {
        Self {
            collector,
            writer,
            dispatcher,
        }
    }

    /// Errors from staging and dispatch propagate to the caller. Search and
    /// fetch failures never do; they only shrink the dataset.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<PipelineResponse> {
        let mut run = PipelineRun::start(now);

        let report = self.collector.collect().await;
        run.mark_crawled()?;
        info!(
            "Total collected: {} (queries failed: {}, items failed: {}, skipped: {})",
            report.records.len(),
            report.queries_failed,
            report.items_failed,
            report.items_skipped
        );

        let staged = self.writer.stage(&report.records, now).await?;
        run.mark_staged(staged.key.as_str())?;

        self.dispatcher.dispatch(&staged, &mut run).await?;
        Ok(run.response())
    }
}
