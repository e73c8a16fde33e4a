//! Research Agent: web search plus Reddit discussion behind one turn loop.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use trendscribe_core::config::{Config, Credentials};
use trendscribe_core::logstore::{LogKind, LogSet};
use trendscribe_core::run::RunInput;
use trendscribe_core::types::Message;
use trendscribe_core::utils::{new_session_id, timestamp};
use trendscribe_providers::{LlmProvider, LlmRequestConfig};

use crate::run::run_logged;
use crate::tools::date::CurrentDateTool;
use crate::tools::grounded::GoogleGroundingSearchTool;
use crate::tools::reddit::{RedditClient, SearchSubredditContentTool, SearchSubredditsTool};
use crate::tools::research::ResearchRunner;
use crate::tools::ToolRegistry;
use crate::turn_loop::TurnLoop;

// ─────────────────────────────────────────────
// ResearchAgent
// ─────────────────────────────────────────────

/// Conversational research agent with its own memory and session.
pub struct ResearchAgent {
    turn_loop: TurnLoop,
    memory: Vec<Message>,
    session_id: String,
    logs: Option<LogSet>,
}

impl ResearchAgent {
    /// Build an agent with the four research tools.
    ///
    /// `logs` is re-tagged with the new agent's session id.
    pub fn new(
        config: &Config,
        credentials: &Credentials,
        provider: Arc<dyn LlmProvider>,
        logs: Option<LogSet>,
    ) -> Self {
        let research = &config.research;
        let reddit = Arc::new(RedditClient::new(&config.providers.reddit, credentials));

        let tools = ToolRegistry::new()
            .with(Arc::new(SearchSubredditContentTool::new(reddit.clone(), &research.search_limits)))
            .with(Arc::new(SearchSubredditsTool::new(reddit, &research.search_limits)))
            .with(Arc::new(GoogleGroundingSearchTool::new(
                &config.providers.gemini,
                &credentials.gemini_api_key,
            )))
            .with(Arc::new(CurrentDateTool));

        let turn_loop = TurnLoop::new(
            provider,
            tools,
            research.system_prompt.clone(),
            research.model.name.clone(),
            LlmRequestConfig::from(&research.model),
        )
        .with_max_rounds(research.max_rounds);

        let session_id = new_session_id();
        info!(session = %session_id, model = %research.model.name, "research agent ready");

        Self {
            memory: vec![Message::system(research.system_prompt.clone())],
            logs: logs.map(|l| l.with_session(&session_id)),
            turn_loop,
            session_id,
        }
    }

    /// Answer one user message and log a `research_run` record.
    ///
    /// Never fails; errors come back as `"[ERROR] ..."`.
    pub async fn chat(&mut self, message: &str) -> String {
        self.push_date();
        self.memory.push(Message::user(message));
        run_logged(
            &self.turn_loop,
            &mut self.memory,
            RunInput::Message(message.to_string()),
            LogKind::ResearchRun,
            self.logs.as_ref(),
            &self.session_id,
        )
        .await
    }

    /// Run the loop over `prompt` without writing a run record.
    pub async fn run_prompt(&mut self, prompt: &str) -> anyhow::Result<String> {
        self.push_date();
        self.memory.push(Message::user(prompt));
        let outcome = self.turn_loop.run(&mut self.memory).await?;
        Ok(outcome.answer)
    }

    pub fn memory(&self) -> &[Message] {
        &self.memory
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn tools(&self) -> &ToolRegistry {
        self.turn_loop.tools()
    }

    fn push_date(&mut self) {
        self.memory
            .push(Message::system(format!("Today's date is {}", timestamp())));
    }
}

// ─────────────────────────────────────────────
// Factory
// ─────────────────────────────────────────────

/// Builds a fresh [`ResearchAgent`] for every research request, so nested
/// delegations never share memory.
pub struct ResearchAgentFactory {
    config: Arc<Config>,
    credentials: Credentials,
    provider: Arc<dyn LlmProvider>,
}

impl ResearchAgentFactory {
    pub fn new(config: Arc<Config>, credentials: Credentials, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            config,
            credentials,
            provider,
        }
    }

    pub fn build(&self) -> ResearchAgent {
        ResearchAgent::new(&self.config, &self.credentials, self.provider.clone(), None)
    }
}

#[async_trait]
impl ResearchRunner for ResearchAgentFactory {
    async fn research(&self, prompt: &str) -> anyhow::Result<String> {
        let mut agent = self.build();
        info!(session = %agent.session_id(), "nested research run");
        agent.run_prompt(prompt).await
    }
}
