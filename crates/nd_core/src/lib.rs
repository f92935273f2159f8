pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod types;

pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use models::{InferenceModel, Prompt};
pub use storage::{InsightStore, ObjectStore};
pub use types::*;
