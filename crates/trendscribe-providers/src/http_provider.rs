//! HTTP-based LLM provider for OpenAI-compatible APIs.
//!
//! Talks directly to any `/chat/completions` endpoint. The default deployment
//! points it at Gemini's OpenAI-compatible surface.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};

use trendscribe_core::config::schema::GeminiConfig;
use trendscribe_core::types::{
    ChatCompletionRequest, ChatCompletionResponse, LlmResponse, Message, ToolDefinition,
};

use crate::traits::{LlmProvider, LlmRequestConfig, ProviderError};

/// Client timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

// ─────────────────────────────────────────────
// HttpProvider
// ─────────────────────────────────────────────

/// A generic LLM provider that talks to any OpenAI-compatible HTTP API.
pub struct HttpProvider {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://generativelanguage.googleapis.com/v1beta/openai"`).
    api_base: String,
    /// API key for Bearer authentication.
    api_key: String,
    /// Default model for this provider instance.
    default_model: String,
    display_name: String,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("api_base", &self.api_base)
            .field("default_model", &self.default_model)
            .field("provider", &self.display_name)
            .finish()
    }
}

impl HttpProvider {
    /// Create a new HttpProvider.
    ///
    /// The client timeout is fixed here for the life of the provider.
    pub fn new(
        api_key: &str,
        api_base: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProviderError::Client)?;

        Ok(HttpProvider {
            client,
            api_base: api_base.to_string(),
            api_key: api_key.to_string(),
            default_model: model.to_string(),
            display_name: display_name_for(api_base).to_string(),
        })
    }

    /// Build a provider for the Gemini compatibility endpoint.
    pub fn gemini(config: &GeminiConfig, model: &str, timeout: Duration) -> Result<Self, ProviderError> {
        debug!(model, api_base = %config.api_base, "Creating LLM provider");
        Self::new(&config.api_key, &config.api_base, model, timeout)
    }

    /// Build the full chat completions URL.
    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }
}

/// Human-readable backend name, for logs and errors.
fn display_name_for(api_base: &str) -> &'static str {
    if api_base.contains("generativelanguage.googleapis.com") {
        "Gemini"
    } else {
        "OpenAI-compatible"
    }
}

#[async_trait]
impl LlmProvider for HttpProvider {
    async fn chat(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        model: &str,
        config: &LlmRequestConfig,
    ) -> Result<LlmResponse, ProviderError> {
        debug!(
            provider = %self.display_name,
            model,
            messages = messages.len(),
            tools = tools.map_or(0, |t| t.len()),
            "Calling LLM"
        );

        let tools = tools.filter(|t| !t.is_empty());
        let request_body = ChatCompletionRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            tools: tools.map(|t| t.to_vec()),
            tool_choice: tools.map(|_| "auto".to_string()),
            max_tokens: config.max_tokens,
            temperature: Some(config.temperature),
            top_p: config.top_p,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|source| {
                error!(provider = %self.display_name, error = %source, "HTTP request failed");
                ProviderError::Http {
                    provider: self.display_name.clone(),
                    source,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(
                provider = %self.display_name,
                status = %status,
                body = %body,
                "API error"
            );
            return Err(ProviderError::Api {
                provider: self.display_name.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let chat_resp = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| {
                error!(provider = %self.display_name, error = %e, "Failed to parse LLM response");
                ProviderError::Decode {
                    provider: self.display_name.clone(),
                    reason: e.to_string(),
                }
            })?;

        let llm_resp = chat_resp
            .into_response()
            .ok_or_else(|| ProviderError::EmptyResponse(self.display_name.clone()))?;

        debug!(
            provider = %self.display_name,
            has_content = llm_resp.content.is_some(),
            tool_calls = llm_resp.tool_calls.len(),
            finish_reason = llm_resp.finish_reason.as_deref().unwrap_or("?"),
            "LLM response received"
        );
        Ok(llm_resp)
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
