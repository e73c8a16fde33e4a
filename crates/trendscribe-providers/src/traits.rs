//! LLM Provider trait — the reasoning backend abstraction.
//!
//! The `HttpProvider` in `http_provider.rs` covers any OpenAI-compatible API,
//! including Gemini's compatibility endpoint.

use async_trait::async_trait;
use thiserror::Error;
use trendscribe_core::config::ModelConfig;
use trendscribe_core::types::{LlmResponse, Message, ToolDefinition};

/// Sampling parameters passed to each LLM call.
#[derive(Clone, Debug, PartialEq)]
pub struct LlmRequestConfig {
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// Maximum tokens to generate. `None` leaves the backend default.
    pub max_tokens: Option<u32>,
    pub top_p: Option<f64>,
}

impl Default for LlmRequestConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: None,
            top_p: None,
        }
    }
}

impl From<&ModelConfig> for LlmRequestConfig {
    fn from(model: &ModelConfig) -> Self {
        Self {
            temperature: model.temperature,
            max_tokens: model.max_tokens,
            top_p: model.top_p,
        }
    }
}

/// A failed backend call.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {provider} failed: {source}")]
    Http {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned {status}: {body}")]
    Api {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("failed to parse {provider} response: {reason}")]
    Decode { provider: String, reason: String },

    #[error("{0} returned no choices")]
    EmptyResponse(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Trait that all LLM providers must implement.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat completion request.
    ///
    /// # Arguments
    /// * `messages` — Conversation in OpenAI format.
    /// * `tools`    — Optional list of tool definitions the LLM can call.
    /// * `model`    — Model identifier (e.g. `"gemini-2.5-flash"`).
    /// * `config`   — Temperature, max_tokens, top_p.
    ///
    /// # Returns
    /// An `LlmResponse` with content and/or tool calls, or the reason the call
    /// failed.
    async fn chat(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        model: &str,
        config: &LlmRequestConfig,
    ) -> Result<LlmResponse, ProviderError>;

    /// The default model for this provider instance.
    fn default_model(&self) -> &str;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
