//! Generation tools: video scripts, articles, X threads and the content
//! quality check. Each is one backend call over a rendered prompt.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use trendscribe_core::config::{render_template, ContentCreatorConfig};
use trendscribe_core::utils::timestamp;

use super::base::{optional_string, require_string, Tool, ToolOutput};
use crate::writer::ContentWriter;

/// Render `template` and run it through the writer.
async fn generate(
    writer: &ContentWriter,
    name: &str,
    template: &str,
    vars: HashMap<&str, String>,
) -> anyhow::Result<ToolOutput> {
    let prompt = render_template(name, template, &vars)?;
    Ok(writer.write(&prompt).await?.into())
}

// ─────────────────────────────────────────────
// generate_platform_content
// ─────────────────────────────────────────────

/// Video script for a short-form or long-form video platform.
pub struct GeneratePlatformContentTool {
    writer: Arc<ContentWriter>,
    config: Arc<ContentCreatorConfig>,
}

impl GeneratePlatformContentTool {
    pub fn new(writer: Arc<ContentWriter>, config: Arc<ContentCreatorConfig>) -> Self {
        Self { writer, config }
    }
}

#[async_trait]
impl Tool for GeneratePlatformContentTool {
    fn name(&self) -> &str {
        "generate_platform_content"
    }

    fn description(&self) -> &str {
        "Write a video script for youtube or tiktok from a research summary, following the platform's hook timing, pacing and style."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "topic": { "type": "string", "description": "Topic of the script" },
                "platform": { "type": "string", "description": "youtube or tiktok" },
                "content_type": { "type": "string", "description": "educational, how-to, storytelling, news, review or comparison (default: educational)" },
                "tone": { "type": "string", "description": "Tone name, e.g. conversational or humorous (default: conversational)" },
                "research_summary": { "type": "string", "description": "Research the script is based on" },
                "duration": { "type": "string", "description": "Target duration (default: the platform's optimal duration)" }
            },
            "required": ["topic", "platform", "research_summary"]
        })
    }

    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<ToolOutput> {
        let topic = require_string(&params, "topic")?;
        let platform = require_string(&params, "platform")?;
        let research_summary = require_string(&params, "research_summary")?;
        let content_type = optional_string(&params, "content_type").unwrap_or_else(|| "educational".into());
        let tone = optional_string(&params, "tone").unwrap_or_else(|| "conversational".into());

        let spec = self.config.platform_spec(&platform);
        let kind = self.config.content_type(&content_type);
        let duration = optional_string(&params, "duration")
            .or(spec.optimal_duration)
            .unwrap_or_default();

        let vars = HashMap::from([
            ("topic", topic),
            ("platform", platform),
            ("tone_description", self.config.tone_description(&tone)),
            ("duration", duration),
            ("pace", spec.pace.unwrap_or_default()),
            ("content_description", kind.description),
            ("content_structure", kind.structure),
            ("style", spec.style),
            ("research_summary", research_summary),
            ("hook_time", spec.hook_time.unwrap_or_default()),
        ]);
        generate(
            &self.writer,
            "content_generation_prompt",
            &self.config.tool_prompts.content_generation_prompt,
            vars,
        )
        .await
    }
}

// ─────────────────────────────────────────────
// generate_article
// ─────────────────────────────────────────────

pub struct GenerateArticleTool {
    writer: Arc<ContentWriter>,
    config: Arc<ContentCreatorConfig>,
}

impl GenerateArticleTool {
    pub fn new(writer: Arc<ContentWriter>, config: Arc<ContentCreatorConfig>) -> Self {
        Self { writer, config }
    }
}

#[async_trait]
impl Tool for GenerateArticleTool {
    fn name(&self) -> &str {
        "generate_article"
    }

    fn description(&self) -> &str {
        "Write a complete, publication-ready article from a research summary."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "topic": { "type": "string", "description": "Article topic" },
                "tone": { "type": "string", "description": "Tone name (default: conversational)" },
                "research_summary": { "type": "string", "description": "Research the article is based on" },
                "style": { "type": "string", "description": "Style guideline (default: the article platform style)" },
                "optimal_length": { "type": "string", "description": "Target length (default: the article platform length)" }
            },
            "required": ["topic", "research_summary"]
        })
    }

    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<ToolOutput> {
        let topic = require_string(&params, "topic")?;
        let research_summary = require_string(&params, "research_summary")?;
        let tone = optional_string(&params, "tone").unwrap_or_else(|| "conversational".into());
        let spec = self.config.platform_spec("article");

        let vars = HashMap::from([
            ("topic", topic),
            ("tone_description", self.config.tone_description(&tone)),
            (
                "optimal_length",
                optional_string(&params, "optimal_length")
                    .or(spec.optimal_length)
                    .unwrap_or_default(),
            ),
            ("style", optional_string(&params, "style").unwrap_or(spec.style)),
            ("research_summary", research_summary),
        ]);
        generate(
            &self.writer,
            "article_generation_prompt",
            &self.config.tool_prompts.article_generation_prompt,
            vars,
        )
        .await
    }
}

// ─────────────────────────────────────────────
// generate_x_thread
// ─────────────────────────────────────────────

pub struct GenerateXThreadTool {
    writer: Arc<ContentWriter>,
    config: Arc<ContentCreatorConfig>,
}

impl GenerateXThreadTool {
    pub fn new(writer: Arc<ContentWriter>, config: Arc<ContentCreatorConfig>) -> Self {
        Self { writer, config }
    }
}

#[async_trait]
impl Tool for GenerateXThreadTool {
    fn name(&self) -> &str {
        "generate_x_thread"
    }

    fn description(&self) -> &str {
        "Write an X (Twitter) thread from a research summary. Posts are numbered and separated by ---."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "topic": { "type": "string", "description": "Thread topic" },
                "tone": { "type": "string", "description": "Tone name (default: conversational)" },
                "research_summary": { "type": "string", "description": "Research the thread is based on" },
                "style": { "type": "string", "description": "Style guideline (default: the x platform style)" },
                "thread_length": { "type": "string", "description": "Number of posts, e.g. 3-5 (default: the x platform length)" }
            },
            "required": ["topic", "research_summary"]
        })
    }

    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<ToolOutput> {
        let topic = require_string(&params, "topic")?;
        let research_summary = require_string(&params, "research_summary")?;
        let tone = optional_string(&params, "tone").unwrap_or_else(|| "conversational".into());
        let spec = self.config.platform_spec("x");

        let vars = HashMap::from([
            ("topic", topic),
            ("tone_description", self.config.tone_description(&tone)),
            (
                "thread_length",
                optional_string(&params, "thread_length")
                    .or(spec.thread_length)
                    .unwrap_or_default(),
            ),
            ("style", optional_string(&params, "style").unwrap_or(spec.style)),
            ("research_summary", research_summary),
        ]);
        generate(
            &self.writer,
            "x_thread_generation_prompt",
            &self.config.tool_prompts.x_thread_generation_prompt,
            vars,
        )
        .await
    }
}

// ─────────────────────────────────────────────
// analyze_content_performance
// ─────────────────────────────────────────────

/// Post-or-trash verdict on a finished piece of content.
pub struct AnalyzeContentTool {
    writer: Arc<ContentWriter>,
    template: String,
}

impl AnalyzeContentTool {
    pub fn new(writer: Arc<ContentWriter>, config: &ContentCreatorConfig) -> Self {
        Self {
            writer,
            template: config.tool_prompts.content_analysis_prompt.clone(),
        }
    }

    pub async fn analyze(&self, content_text: &str, platform: &str) -> anyhow::Result<String> {
        let vars = HashMap::from([
            ("platform", platform.to_string()),
            ("content_text", content_text.to_string()),
            ("current_date", timestamp()),
        ]);
        let prompt = render_template("content_analysis_prompt", &self.template, &vars)?;
        self.writer.write(&prompt).await
    }
}

#[async_trait]
impl Tool for AnalyzeContentTool {
    fn name(&self) -> &str {
        "analyze_content_performance"
    }

    fn description(&self) -> &str {
        "Judge whether a piece of content is ready to post on a platform, with the single highest-impact fix if it is not."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "content_text": { "type": "string", "description": "The content to judge" },
                "platform": { "type": "string", "description": "Platform it will be posted on" }
            },
            "required": ["content_text", "platform"]
        })
    }

    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<ToolOutput> {
        let content_text = require_string(&params, "content_text")?;
        let platform = require_string(&params, "platform")?;
        Ok(self.analyze(&content_text, &platform).await?.into())
    }
}
