//! Single-shot generation: one backend call with a rendered prompt, no tools.

use std::sync::Arc;

use tracing::debug;

use trendscribe_core::types::Message;
use trendscribe_providers::{LlmProvider, LlmRequestConfig};

/// Sends one prompt to the backend under the content system prompt.
pub struct ContentWriter {
    provider: Arc<dyn LlmProvider>,
    model: String,
    request_config: LlmRequestConfig,
    system_prompt: String,
}

impl ContentWriter {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        model: impl Into<String>,
        request_config: LlmRequestConfig,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            request_config,
            system_prompt: system_prompt.into(),
        }
    }

    /// Generate text for `prompt`. An empty answer is returned as-is.
    pub async fn write(&self, prompt: &str) -> anyhow::Result<String> {
        let messages = [Message::system(self.system_prompt.clone()), Message::user(prompt)];
        debug!(model = %self.model, prompt_len = prompt.len(), "single-shot generation");

        let response = self
            .provider
            .chat(&messages, None, &self.model, &self.request_config)
            .await?;
        Ok(response.content.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockProvider;

    #[tokio::test]
    async fn test_write_sends_system_and_prompt() {
        let provider = Arc::new(MockProvider::simple("draft"));
        let writer = ContentWriter::new(provider.clone(), "m", LlmRequestConfig::default(), "be brief");

        assert_eq!(writer.write("about rust").await.unwrap(), "draft");
        let sent = &provider.submissions()[0];
        assert_eq!(sent, &vec![Message::system("be brief"), Message::user("about rust")]);
    }

    #[tokio::test]
    async fn test_write_backend_failure() {
        let writer = ContentWriter::new(
            Arc::new(MockProvider::failing()),
            "m",
            LlmRequestConfig::default(),
            "s",
        );
        let err = writer.write("x").await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }
}
