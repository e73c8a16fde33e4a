//! Test doubles shared by the agent tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use trendscribe_core::config::{Config, Credentials};
use trendscribe_core::types::{LlmResponse, Message, ToolCall, ToolDefinition};
use trendscribe_providers::{LlmProvider, LlmRequestConfig, ProviderError};

use crate::tools::research::ResearchRunner;
use crate::tools::{Tool, ToolOutput};

/// A mock LLM provider that returns canned responses and records what it
/// was sent.
pub struct MockProvider {
    responses: Mutex<VecDeque<LlmResponse>>,
    submissions: Mutex<Vec<Vec<Message>>>,
    fail: bool,
}

impl MockProvider {
    pub fn new(responses: Vec<LlmResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            submissions: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn simple(text: &str) -> Self {
        Self::new(vec![LlmResponse::text(text)])
    }

    /// Every call fails with an API error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    /// The turns submitted on each call, in call order.
    pub fn submissions(&self) -> Vec<Vec<Message>> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn chat(
        &self,
        messages: &[Message],
        _tools: Option<&[ToolDefinition]>,
        _model: &str,
        _config: &LlmRequestConfig,
    ) -> Result<LlmResponse, ProviderError> {
        self.submissions.lock().unwrap().push(messages.to_vec());
        if self.fail {
            return Err(ProviderError::Api {
                provider: "Mock".into(),
                status: 500,
                body: "backend down".into(),
            });
        }
        let next = self.responses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| LlmResponse::text("(no more responses)")))
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }

    fn display_name(&self) -> &str {
        "MockProvider"
    }
}

/// A response requesting the given `(id, name, arguments)` tool calls.
pub fn tool_call_response(calls: &[(&str, &str, &str)]) -> LlmResponse {
    LlmResponse {
        tool_calls: calls
            .iter()
            .map(|(id, name, args)| ToolCall::new(*id, *name, *args))
            .collect(),
        finish_reason: Some("tool_calls".into()),
        ..Default::default()
    }
}

/// Tool named `record` that remembers the `label` argument of each call.
#[derive(Default)]
pub struct RecordingTool {
    seen: Mutex<Vec<String>>,
}

impl RecordingTool {
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Tool for RecordingTool {
    fn name(&self) -> &str {
        "record"
    }

    fn description(&self) -> &str {
        "Records its label"
    }

    fn parameters(&self) -> Value {
        json!({"type": "object", "properties": {"label": {"type": "string"}}, "required": []})
    }

    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<ToolOutput> {
        let label = params
            .get("label")
            .and_then(|v| v.as_str())
            .unwrap_or("(none)")
            .to_string();
        self.seen.lock().unwrap().push(label.clone());
        Ok(format!("recorded {label}").into())
    }
}

/// Research runner with a fixed answer (or a fixed failure).
pub struct StubResearch {
    answer: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl StubResearch {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Ok(answer.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            answer: Err(reason.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResearchRunner for StubResearch {
    async fn research(&self, prompt: &str) -> anyhow::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer.clone().map_err(anyhow::Error::msg)
    }
}

pub fn test_credentials() -> Credentials {
    Credentials {
        gemini_api_key: "gemini-key".into(),
        reddit_client_id: "reddit-id".into(),
        reddit_client_secret: "reddit-secret".into(),
    }
}

/// Default config with logs and output rooted in `dir`.
pub fn test_config(dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.paths.logs_dir = dir.join("logs").to_string_lossy().into_owned();
    config.paths.output_root = dir.join("out").to_string_lossy().into_owned();
    config
}
