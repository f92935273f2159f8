use async_trait::async_trait;
use nd_core::{InferenceModel, Prompt, Result};

/// Offline model. Echoes the first words of the article text so runs are
/// reproducible without network access.
#[derive(Debug, Default)]
pub struct DummyModel;

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl InferenceModel for DummyModel {
    fn name(&self) -> &str {
        "dummy"
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        let text = prompt
            .user
            .split_once("Article text:\n")
            .map(|(_, text)| text)
            .unwrap_or(&prompt.user);
        let words: Vec<&str> = text.split_whitespace().take(20).collect();
        Ok(words.join(" "))
    }
}
