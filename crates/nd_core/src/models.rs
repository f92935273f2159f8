use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A chat-style request: one system message and one user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

#[async_trait]
pub trait InferenceModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Text in, text out. Implementations return the raw completion.
    async fn generate(&self, prompt: &Prompt) -> Result<String>;
}
