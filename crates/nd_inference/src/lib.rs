pub mod analyzer;
pub mod models;
pub mod prompts;

pub use analyzer::{AnalysisReport, Analyzer};
pub use models::{create_model, DummyModel, OpenAiModel};

pub mod prelude {
    pub use super::analyzer::{AnalysisReport, Analyzer};
    pub use super::models::{create_model, DummyModel, OpenAiModel};
    pub use nd_core::{Error, InferenceModel, Prompt, Result};
}
