//! Content Agent: research, per-platform generation and file output.
//!
//! [`ContentAgent::create_content`] runs the fixed pipeline; [`ContentAgent::chat`]
//! lets the model drive the same tools itself.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use trendscribe_core::config::{Config, ContentCreatorConfig, Credentials};
use trendscribe_core::logstore::{LogAnalytics, LogKind, LogSet};
use trendscribe_core::run::{ContentRequest, ContentResult, RunInput, RunRecord};
use trendscribe_core::types::Message;
use trendscribe_core::utils::{expand_home, new_session_id, timestamp, truncate_chars};
use trendscribe_providers::{LlmProvider, LlmRequestConfig};

use crate::research_agent::ResearchAgentFactory;
use crate::run::{error_chain, run_logged, ERROR_PREFIX};
use crate::tools::files::SaveContentTool;
use crate::tools::generate::{
    AnalyzeContentTool, GenerateArticleTool, GeneratePlatformContentTool, GenerateXThreadTool,
};
use crate::tools::research::{ResearchRunner, ResearchTopicTool, ResearchTrendingTool};
use crate::tools::{Tool, ToolRegistry};
use crate::turn_loop::TurnLoop;
use crate::writer::ContentWriter;

/// Characters of research output kept in a `research` log entry.
const PREVIEW_CHARS: usize = 200;

/// Payload of a `research` log entry.
#[derive(Debug, Serialize)]
struct ResearchEntry<'a> {
    topic: &'a str,
    platform_focus: &'a str,
    results_length: usize,
    results_preview: String,
    latency_secs: f64,
    success: bool,
}

/// Payload of a `performance` log entry.
#[derive(Debug, Default, Serialize)]
struct PipelineTimings {
    research_secs: f64,
    generation_secs: BTreeMap<String, f64>,
    total_secs: f64,
}

fn secs(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 1000.0).round() / 1000.0
}

/// Turn a JSON object into tool arguments.
fn args(value: Value) -> HashMap<String, Value> {
    serde_json::from_value(value).unwrap_or_default()
}

// ─────────────────────────────────────────────
// ContentAgent
// ─────────────────────────────────────────────

pub struct ContentAgent {
    config: Arc<ContentCreatorConfig>,
    turn_loop: TurnLoop,
    memory: Vec<Message>,
    session_id: String,
    logs: Option<LogSet>,
    research_topic: Arc<ResearchTopicTool>,
    research_trending: Arc<ResearchTrendingTool>,
    script: Arc<GeneratePlatformContentTool>,
    article: Arc<GenerateArticleTool>,
    thread: Arc<GenerateXThreadTool>,
    analyzer: Arc<AnalyzeContentTool>,
    saver: Arc<SaveContentTool>,
}

impl ContentAgent {
    /// Build an agent whose research runs on fresh Research Agents.
    pub fn new(
        config: &Config,
        credentials: &Credentials,
        provider: Arc<dyn LlmProvider>,
        logs: Option<LogSet>,
    ) -> Self {
        let research = Arc::new(ResearchAgentFactory::new(
            Arc::new(config.clone()),
            credentials.clone(),
            provider.clone(),
        ));
        Self::with_research_runner(config, provider, research, logs)
    }

    /// Build an agent with a custom research runner.
    pub(crate) fn with_research_runner(
        config: &Config,
        provider: Arc<dyn LlmProvider>,
        research: Arc<dyn ResearchRunner>,
        logs: Option<LogSet>,
    ) -> Self {
        let content = Arc::new(config.content.clone());
        let writer = Arc::new(ContentWriter::new(
            provider.clone(),
            content.model.name.clone(),
            LlmRequestConfig::from(&content.model),
            content.system_prompt.clone(),
        ));

        let research_topic = Arc::new(ResearchTopicTool::new(research.clone(), &content.tool_prompts));
        let research_trending = Arc::new(ResearchTrendingTool::new(research, &content.tool_prompts));
        let script = Arc::new(GeneratePlatformContentTool::new(writer.clone(), content.clone()));
        let article = Arc::new(GenerateArticleTool::new(writer.clone(), content.clone()));
        let thread = Arc::new(GenerateXThreadTool::new(writer.clone(), content.clone()));
        let analyzer = Arc::new(AnalyzeContentTool::new(writer, &content));
        let saver = Arc::new(SaveContentTool::new(expand_home(&config.paths.output_root)));

        let tools = ToolRegistry::new()
            .with(research_topic.clone())
            .with(research_trending.clone())
            .with(script.clone())
            .with(article.clone())
            .with(thread.clone())
            .with(analyzer.clone())
            .with(saver.clone());

        let turn_loop = TurnLoop::new(
            provider,
            tools,
            content.system_prompt.clone(),
            content.model.name.clone(),
            LlmRequestConfig::from(&content.model),
        )
        .with_max_rounds(content.max_rounds);

        let session_id = new_session_id();
        info!(session = %session_id, model = %content.model.name, "content agent ready");

        Self {
            memory: vec![Message::system(content.system_prompt.clone())],
            logs: logs.map(|l| l.with_session(&session_id)),
            config: content,
            turn_loop,
            session_id,
            research_topic,
            research_trending,
            script,
            article,
            thread,
            analyzer,
            saver,
        }
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

    pub fn config(&self) -> &ContentCreatorConfig {
        &self.config
    }

    // ─────────────────────────────────────────
    // Pipeline
    // ─────────────────────────────────────────

    /// Research the topic, then generate and save content per platform.
    ///
    /// Never fails: errors land in [`ContentResult::error`] with the partial
    /// results kept. Writes exactly one `content_creation` record.
    pub async fn create_content(&mut self, request: ContentRequest) -> ContentResult {
        let started = Instant::now();
        let mut record = RunRecord::start(RunInput::Content(request.clone()), &self.session_id);
        let mut result = ContentResult::new(&request);
        let mut timings = PipelineTimings::default();

        info!(
            session = %self.session_id,
            topic = %request.topic,
            platforms = ?request.platforms,
            "creating content"
        );
        self.memory
            .push(Message::system(format!("Today's date is {}", timestamp())));

        match self.run_pipeline(&request, &mut result, &mut timings).await {
            Ok(()) => {
                record.success = true;
                record.answer = format!(
                    "Generated content for {}. See files for details.",
                    request.platforms.join(", ")
                );
            }
            Err(e) => {
                let message = format!("{e:#}");
                error!(session = %self.session_id, topic = %request.topic, "content pipeline failed: {}", message);

                if let Some(logs) = &self.logs {
                    logs.record_error(&json!({
                        "error_type": "content_creation_error",
                        "topic": request.topic,
                        "platforms": request.platforms,
                        "content_type": request.content_type,
                        "error": message,
                        "latency_secs": secs(started.elapsed()),
                    }));
                }
                record.answer = format!("{ERROR_PREFIX} {message}");
                record.error = Some(error_chain(e));
                result.error = Some(message);
            }
        }

        timings.total_secs = secs(started.elapsed());
        record.set_latency(started.elapsed());
        record.files_saved = result.files.values().cloned().collect();
        record.generated = Some(result.clone());

        if let Some(logs) = &self.logs {
            logs.record(LogKind::Performance, &timings);
            logs.record(LogKind::ContentCreation, &record);
        }
        result
    }

    async fn run_pipeline(
        &mut self,
        request: &ContentRequest,
        result: &mut ContentResult,
        timings: &mut PipelineTimings,
    ) -> anyhow::Result<()> {
        let research_started = Instant::now();
        let focus = request.platforms.join(", ");
        let research = self
            .delegate_research(&request.topic, &focus)
            .await
            .context("research step failed")?;
        timings.research_secs = secs(research_started.elapsed());

        self.memory.push(Message::system(format!(
            "Research summary for {}:\n{}",
            request.topic, research
        )));

        let mut failures = Vec::new();
        for platform in &request.platforms {
            let started = Instant::now();
            let generated = self.generate(platform, request, &research).await;
            timings
                .generation_secs
                .insert(platform.clone(), secs(started.elapsed()));

            let content = match generated {
                Ok(Some(content)) => content,
                Ok(None) => continue,
                Err(e) => {
                    warn!(platform = %platform, "generation failed: {:#}", e);
                    failures.push(format!("{platform}: {e:#}"));
                    continue;
                }
            };
            if content.trim().is_empty() {
                warn!(platform = %platform, "generation returned no text; nothing saved");
                continue;
            }

            result.content.insert(platform.clone(), content.clone());
            match self.save(platform, &request.topic, &content).await {
                Ok(path) => {
                    result.files.insert(platform.clone(), path);
                }
                Err(e) => {
                    warn!(platform = %platform, "save failed: {:#}", e);
                    failures.push(format!("{platform}: {e:#}"));
                }
            }
        }

        if !failures.is_empty() {
            anyhow::bail!(
                "{} of {} platform(s) failed: {}",
                failures.len(),
                request.platforms.len(),
                failures.join("; ")
            );
        }
        Ok(())
    }

    /// Generated text for one platform, or `None` for an unknown platform.
    async fn generate(
        &self,
        platform: &str,
        request: &ContentRequest,
        research: &str,
    ) -> anyhow::Result<Option<String>> {
        let (tool, params): (&dyn Tool, Value) = match platform {
            "youtube" | "tiktok" => (
                self.script.as_ref() as &dyn Tool,
                json!({
                    "topic": request.topic,
                    "platform": platform,
                    "content_type": request.content_type,
                    "tone": request.tone,
                    "research_summary": research,
                    "duration": request.duration,
                }),
            ),
            "article" => (
                self.article.as_ref() as &dyn Tool,
                json!({ "topic": request.topic, "tone": request.tone, "research_summary": research }),
            ),
            "x" => (
                self.thread.as_ref() as &dyn Tool,
                json!({ "topic": request.topic, "tone": request.tone, "research_summary": research }),
            ),
            other => {
                warn!(platform = other, "unsupported platform skipped");
                return Ok(None);
            }
        };

        let output = tool.execute(args(params)).await?;
        Ok(Some(output.into_content()))
    }

    async fn save(&self, platform: &str, topic: &str, content: &str) -> anyhow::Result<String> {
        let folder = self.config.output_folder(platform)?;
        let path = self.saver.save(content, folder, topic, platform).await?;
        Ok(path.display().to_string())
    }

    /// Research through the topic tool and log a `research` entry.
    async fn delegate_research(&self, topic: &str, platform_focus: &str) -> anyhow::Result<String> {
        let started = Instant::now();
        let results = self.research_topic.research(topic, platform_focus).await?;
        self.log_research(topic, platform_focus, &results, started.elapsed());
        Ok(results)
    }

    fn log_research(&self, topic: &str, platform_focus: &str, results: &str, elapsed: Duration) {
        if let Some(logs) = &self.logs {
            logs.record(
                LogKind::Research,
                &ResearchEntry {
                    topic,
                    platform_focus,
                    results_length: results.len(),
                    results_preview: truncate_chars(results, PREVIEW_CHARS),
                    latency_secs: secs(elapsed),
                    success: true,
                },
            );
        }
    }

    fn log_failure(&self, error_type: &str, fields: Value, message: &str, elapsed: Duration) {
        if let Some(logs) = &self.logs {
            let mut data = json!({
                "error_type": error_type,
                "error": message,
                "latency_secs": secs(elapsed),
            });
            if let (Some(data), Value::Object(fields)) = (data.as_object_mut(), fields) {
                data.extend(fields);
            }
            logs.record_error(&data);
        }
    }

    // ─────────────────────────────────────────
    // Direct operations
    // ─────────────────────────────────────────

    /// Free-form conversation over the content tools, logged as `content_run`.
    pub async fn chat(&mut self, message: &str) -> String {
        self.memory
            .push(Message::system(format!("Today's date is {}", timestamp())));
        self.memory.push(Message::user(message));
        run_logged(
            &self.turn_loop,
            &mut self.memory,
            RunInput::Message(message.to_string()),
            LogKind::ContentRun,
            self.logs.as_ref(),
            &self.session_id,
        )
        .await
    }

    /// Research a topic for content. Returns the brief or an error string.
    pub async fn research_topic(&self, topic: &str, platform_focus: &str) -> String {
        let started = Instant::now();
        match self.delegate_research(topic, platform_focus).await {
            Ok(results) => results,
            Err(e) => {
                let message = format!("Research error: {e:#}");
                self.log_failure(
                    "research_error",
                    json!({ "topic": topic, "platform_focus": platform_focus }),
                    &message,
                    started.elapsed(),
                );
                message
            }
        }
    }

    /// Research current trends in a category. Returns the report or an error string.
    pub async fn research_trending(&self, category: &str) -> String {
        let started = Instant::now();
        match self.research_trending.research(category).await {
            Ok(results) => {
                self.log_research(&format!("trending_{category}"), category, &results, started.elapsed());
                results
            }
            Err(e) => {
                let message = format!("Trending research error: {e:#}");
                self.log_failure(
                    "trending_research_error",
                    json!({ "category": category }),
                    &message,
                    started.elapsed(),
                );
                message
            }
        }
    }

    /// Post-or-trash verdict for `content` on `platform`.
    pub async fn analyze_content(&self, content: &str, platform: &str) -> String {
        match self.analyzer.analyze(content, platform).await {
            Ok(verdict) => verdict,
            Err(e) => format!("Analysis error: {e:#}"),
        }
    }

    /// Usage statistics over this agent's run and error stores.
    pub fn analytics(&self) -> anyhow::Result<LogAnalytics> {
        let logs = self
            .logs
            .as_ref()
            .context("logging is disabled for the content agent")?;
        Ok(logs.analytics()?)
    }
}
