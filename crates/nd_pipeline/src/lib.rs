use std::sync::Arc;

use nd_core::config::{ExecutorKind, NotifierKind};
use nd_core::{Error, PipelineConfig, Result};
use nd_scrappers::{Collector, NaverScraper};
use nd_storage::DatasetWriter;

pub mod dispatcher;
pub mod notify;
pub mod pipeline;
pub mod remote;

pub use dispatcher::PipelineDispatcher;
pub use notify::{LogNotifier, NoopNotifier, Notification, Notifier, WebhookNotifier};
pub use pipeline::DailyPipeline;
pub use remote::{CommandRequest, HttpExecutor, LocalExecutor, RemoteExecutor};

pub fn create_executor(config: &PipelineConfig) -> Result<Arc<dyn RemoteExecutor>> {
    match config.dispatch.executor {
        ExecutorKind::Local => Ok(Arc::new(LocalExecutor::new())),
        ExecutorKind::Http => {
            let url = config
                .dispatch
                .executor_url
                .clone()
                .ok_or_else(|| Error::Config("dispatch.executor_url is not set".into()))?;
            Ok(Arc::new(HttpExecutor::new(url)?))
        }
    }
}

pub fn create_notifier(config: &PipelineConfig) -> Result<Arc<dyn Notifier>> {
    match config.dispatch.notifier {
        NotifierKind::Log => Ok(Arc::new(LogNotifier)),
        NotifierKind::Webhook => {
            let url = config
                .dispatch
                .webhook_url
                .clone()
                .ok_or_else(|| Error::Config("dispatch.webhook_url is not set".into()))?;
            Ok(Arc::new(WebhookNotifier::new(url, config.dispatch.topic.clone())?))
        }
    }
}

/// Wires the production pipeline from configuration.
pub fn create_pipeline(config: &PipelineConfig) -> Result<DailyPipeline> {
    let scraper = Arc::new(NaverScraper::new(&config.collector)?);
    let collector = Collector::new(scraper, config.collector.queries.clone());
    let store = nd_storage::create_object_store(&config.dataset);
    let writer = DatasetWriter::from_config(store, &config.dataset);
    let dispatcher = PipelineDispatcher::new(
        create_executor(config)?,
        create_notifier(config)?,
        config.dispatch.clone(),
    );
    Ok(DailyPipeline::new(collector, writer, dispatcher))
}

pub mod prelude {
    pub use super::{create_pipeline, DailyPipeline, Notifier, PipelineDispatcher, RemoteExecutor};
    pub use nd_core::{Error, PipelineResponse, Result};
}
