//! Turn loop — alternates LLM calls and tool execution until a final answer.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use trendscribe_core::run::ToolCallSummary;
use trendscribe_core::types::Message;
use trendscribe_providers::{LlmProvider, LlmRequestConfig, ProviderError};

use crate::tools::ToolRegistry;

/// Default maximum LLM ↔ tool rounds per invocation.
pub const DEFAULT_MAX_ROUNDS: usize = 20;

/// Why a loop run produced no answer.
#[derive(Debug, Error)]
pub enum LoopError {
    #[error("no final answer after {0} rounds")]
    RoundLimitExceeded(usize),

    #[error("reasoning backend failed")]
    Provider(#[from] ProviderError),
}

/// Result of one successful loop run.
#[derive(Clone, Debug, Default)]
pub struct TurnOutcome {
    pub answer: String,
    /// Every tool call made during the run, in execution order.
    pub tool_calls: Vec<ToolCallSummary>,
    /// Sum of `total_tokens` over the rounds that reported usage.
    pub token_usage: Option<u32>,
    pub rounds: usize,
}

// ─────────────────────────────────────────────
// TurnLoop
// ─────────────────────────────────────────────

/// One agent's reasoning loop: provider, tools and instructions.
pub struct TurnLoop {
    provider: Arc<dyn LlmProvider>,
    tools: ToolRegistry,
    system_prompt: String,
    model: String,
    request_config: LlmRequestConfig,
    max_rounds: usize,
}

impl TurnLoop {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: ToolRegistry,
        system_prompt: impl Into<String>,
        model: impl Into<String>,
        request_config: LlmRequestConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            system_prompt: system_prompt.into(),
            model: model.into(),
            request_config,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    /// Set the round limit (at least 1).
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn request_config(&self) -> &LlmRequestConfig {
        &self.request_config
    }

    /// Run until the model answers without requesting tools.
    ///
    /// Every assistant turn, tool turn and the final answer are appended to
    /// `memory`, also when the run fails part way.
    pub async fn run(&self, memory: &mut Vec<Message>) -> Result<TurnOutcome, LoopError> {
        let tool_defs = self.tools.get_definitions();
        let start = memory.len();
        let mut token_usage: Option<u32> = None;

        for round in 1..=self.max_rounds {
            debug!(round, turns = memory.len(), "LLM call");

            let response = {
                let submission = self.submission(memory);
                self.provider
                    .chat(&submission, Some(&tool_defs), &self.model, &self.request_config)
                    .await?
            };

            if let Some(usage) = &response.usage {
                token_usage = Some(token_usage.unwrap_or(0) + usage.total_tokens);
            }

            if !response.has_tool_calls() {
                let answer = response.content.unwrap_or_default();
                memory.push(Message::assistant(answer.clone()));
                return Ok(TurnOutcome {
                    answer,
                    tool_calls: tool_summaries(&memory[start..]),
                    token_usage,
                    rounds: round,
                });
            }

            let calls = response.tool_calls;
            memory.push(Message::assistant_tool_calls(response.content, calls.clone()));

            for call in &calls {
                let params: HashMap<String, serde_json::Value> =
                    serde_json::from_str(&call.function.arguments).unwrap_or_default();

                info!(tool = %call.function.name, round, "executing tool call");
                let result = self.tools.execute(&call.function.name, params).await;
                debug!(tool = %call.function.name, result_len = result.len(), "tool result");

                memory.push(Message::tool_result(&call.id, result));
            }
        }

        Err(LoopError::RoundLimitExceeded(self.max_rounds))
    }

    /// The turns to submit: memory, with the system prompt in front when
    /// memory does not start with a system turn.
    fn submission<'a>(&self, memory: &'a [Message]) -> Cow<'a, [Message]> {
        if memory.first().is_some_and(Message::is_system) {
            Cow::Borrowed(memory)
        } else {
            let mut turns = Vec::with_capacity(memory.len() + 1);
            turns.push(Message::system(self.system_prompt.clone()));
            turns.extend_from_slice(memory);
            Cow::Owned(turns)
        }
    }
}

/// Pair each `tool` turn with the call that requested it.
pub fn tool_summaries(turns: &[Message]) -> Vec<ToolCallSummary> {
    let mut names: HashMap<&str, &str> = HashMap::new();
    let mut summaries = Vec::new();

    for turn in turns {
        match turn {
            Message::Assistant {
                tool_calls: Some(calls),
                ..
            } => {
                for call in calls {
                    names.insert(&call.id, &call.function.name);
                }
            }
            Message::Tool {
                content,
                tool_call_id,
            } => summaries.push(ToolCallSummary {
                tool_name: names.get(tool_call_id.as_str()).copied().unwrap_or("unknown").to_string(),
                tool_call_id: tool_call_id.clone(),
                content: content.clone(),
            }),
            _ => {}
        }
    }
    summaries
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{tool_call_response, MockProvider, RecordingTool};
    use trendscribe_core::types::{LlmResponse, UsageInfo};

    fn make_loop(provider: Arc<MockProvider>, tools: ToolRegistry) -> TurnLoop {
        TurnLoop::new(
            provider,
            tools,
            "You are a test agent.",
            "mock-model",
            LlmRequestConfig::default(),
        )
        .with_max_rounds(5)
    }

    #[tokio::test]
    async fn test_simple_answer() {
        let provider = Arc::new(MockProvider::simple("Hello!"));
        let turn_loop = make_loop(provider.clone(), ToolRegistry::new());

        let mut memory = vec![Message::user("hi")];
        let outcome = turn_loop.run(&mut memory).await.unwrap();

        assert_eq!(outcome.answer, "Hello!");
        assert_eq!(outcome.rounds, 1);
        assert!(outcome.tool_calls.is_empty());
        assert_eq!(memory.len(), 2);
        assert_eq!(memory[1], Message::assistant("Hello!"));
    }

    #[tokio::test]
    async fn test_system_prompt_synthesized_not_stored() {
        let provider = Arc::new(MockProvider::simple("ok"));
        let turn_loop = make_loop(provider.clone(), ToolRegistry::new());

        let mut memory = vec![Message::user("hi")];
        turn_loop.run(&mut memory).await.unwrap();

        let submitted = provider.submissions();
        assert_eq!(submitted[0][0], Message::system("You are a test agent."));
        assert_eq!(submitted[0][1], Message::user("hi"));
        // Memory itself is never rewritten.
        assert_eq!(memory[0], Message::user("hi"));
    }

    #[tokio::test]
    async fn test_existing_system_turn_kept() {
        let provider = Arc::new(MockProvider::simple("ok"));
        let turn_loop = make_loop(provider.clone(), ToolRegistry::new());

        let mut memory = vec![Message::system("custom"), Message::user("hi")];
        turn_loop.run(&mut memory).await.unwrap();

        let submitted = provider.submissions();
        assert_eq!(submitted[0].len(), 2);
        assert_eq!(submitted[0][0], Message::system("custom"));
    }

    #[tokio::test]
    async fn test_two_tool_calls_in_order() {
        let provider = Arc::new(MockProvider::new(vec![
            tool_call_response(&[
                ("call_a", "record", r#"{"label": "first"}"#),
                ("call_b", "record", r#"{"label": "second"}"#),
            ]),
            LlmResponse::text("done"),
        ]));
        let tool = Arc::new(RecordingTool::default());
        let turn_loop = make_loop(provider.clone(), ToolRegistry::new().with(tool.clone()));

        let mut memory = vec![Message::system("s"), Message::user("go")];
        let outcome = turn_loop.run(&mut memory).await.unwrap();

        // system, user, assistant(tool calls), tool, tool, assistant
        assert_eq!(memory.len(), 6);
        assert!(matches!(&memory[3], Message::Tool { tool_call_id, .. } if tool_call_id == "call_a"));
        assert!(matches!(&memory[4], Message::Tool { tool_call_id, .. } if tool_call_id == "call_b"));
        assert_eq!(tool.seen(), vec!["first", "second"]);

        // Both tool turns were submitted before the second LLM call.
        let second = &provider.submissions()[1];
        assert_eq!(second.len(), 5);
        assert!(matches!(second.last(), Some(Message::Tool { tool_call_id, .. }) if tool_call_id == "call_b"));

        assert_eq!(outcome.tool_calls.len(), 2);
        assert_eq!(outcome.tool_calls[0].tool_name, "record");
        assert_eq!(outcome.tool_calls[1].tool_call_id, "call_b");
        assert_eq!(outcome.answer, "done");
    }

    #[tokio::test]
    async fn test_invalid_arguments_become_empty_map() {
        let provider = Arc::new(MockProvider::new(vec![
            tool_call_response(&[("call_x", "record", "not json")]),
            LlmResponse::text("done"),
        ]));
        let tool = Arc::new(RecordingTool::default());
        let turn_loop = make_loop(provider, ToolRegistry::new().with(tool.clone()));

        let mut memory = vec![Message::user("go")];
        turn_loop.run(&mut memory).await.unwrap();

        assert_eq!(tool.seen(), vec!["(none)"]);
    }

    #[tokio::test]
    async fn test_unknown_tool_reported_to_model() {
        let provider = Arc::new(MockProvider::new(vec![
            tool_call_response(&[("call_1", "nope", "{}")]),
            LlmResponse::text("sorry"),
        ]));
        let turn_loop = make_loop(provider, ToolRegistry::new());

        let mut memory = vec![Message::user("go")];
        let outcome = turn_loop.run(&mut memory).await.unwrap();

        assert_eq!(outcome.tool_calls[0].content, "Error: Tool 'nope' not found");
        assert_eq!(outcome.tool_calls[0].tool_name, "nope");
    }

    #[tokio::test]
    async fn test_round_limit_exceeded() {
        let responses = (0..10)
            .map(|i| tool_call_response(&[(&format!("call_{i}"), "record", "{}")]))
            .collect();
        let provider = Arc::new(MockProvider::new(responses));
        let tool = Arc::new(RecordingTool::default());
        let turn_loop = make_loop(provider.clone(), ToolRegistry::new().with(tool));

        let mut memory = vec![Message::user("loop forever")];
        let err = turn_loop.run(&mut memory).await.unwrap_err();

        assert!(matches!(err, LoopError::RoundLimitExceeded(5)));
        assert_eq!(provider.submissions().len(), 5);
        // user + 5 × (assistant + tool)
        assert_eq!(memory.len(), 11);
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let provider = Arc::new(MockProvider::failing());
        let turn_loop = make_loop(provider, ToolRegistry::new());

        let mut memory = vec![Message::user("hi")];
        let err = turn_loop.run(&mut memory).await.unwrap_err();
        assert!(matches!(err, LoopError::Provider(_)));
        assert_eq!(memory.len(), 1);
    }

    #[tokio::test]
    async fn test_token_usage_summed() {
        let usage = |n| {
            Some(UsageInfo {
                prompt_tokens: 0,
                completion_tokens: n,
                total_tokens: n,
            })
        };
        let mut first = tool_call_response(&[("c1", "record", "{}")]);
        first.usage = usage(10);
        let mut second = LlmResponse::text("done");
        second.usage = usage(32);

        let provider = Arc::new(MockProvider::new(vec![first, second]));
        let turn_loop = make_loop(provider, ToolRegistry::new().with(Arc::new(RecordingTool::default())));

        let mut memory = vec![Message::user("go")];
        let outcome = turn_loop.run(&mut memory).await.unwrap();
        assert_eq!(outcome.token_usage, Some(42));
    }

    #[test]
    fn test_tool_summaries_pairs_names() {
        use trendscribe_core::types::ToolCall;
        let turns = vec![
            Message::assistant_tool_calls(None, vec![ToolCall::new("a", "search_subreddits", "{}")]),
            Message::tool_result("a", "[]"),
        ];
        let summaries = tool_summaries(&turns);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].tool_name, "search_subreddits");
        assert_eq!(summaries[0].content, "[]");
    }
}
