use std::sync::Arc;

use nd_core::config::{AnalyzerConfig, ModelBackend};
use nd_core::{InferenceModel, Result};

pub mod dummy;
pub mod openai;

pub use dummy::DummyModel;
pub use openai::OpenAiModel;

pub fn create_model(config: &AnalyzerConfig) -> Result<Arc<dyn InferenceModel>> {
    match config.backend {
        ModelBackend::OpenAi => Ok(Arc::new(OpenAiModel::new(
            config.api_key.clone(),
            config.api_base.clone(),
            config.model.clone(),
        )?)),
        ModelBackend::Dummy => Ok(Arc::new(DummyModel::new())),
    }
}
