//! Research delegation tools used by the content agent.
//!
//! Each call renders a research template and hands it to a
//! [`ResearchRunner`], which runs a fresh research loop.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use trendscribe_core::config::{render_template, ToolPrompts};
use trendscribe_core::utils::timestamp;

use super::base::{optional_string, require_string, Tool, ToolOutput};

/// Anything that can answer a research prompt with a fresh research run.
#[async_trait]
pub trait ResearchRunner: Send + Sync {
    async fn research(&self, prompt: &str) -> anyhow::Result<String>;
}

// ─────────────────────────────────────────────
// research_topic_for_content
// ─────────────────────────────────────────────

/// Researches one topic for content on the given platforms.
pub struct ResearchTopicTool {
    runner: Arc<dyn ResearchRunner>,
    template: String,
}

impl ResearchTopicTool {
    pub fn new(runner: Arc<dyn ResearchRunner>, prompts: &ToolPrompts) -> Self {
        Self {
            runner,
            template: prompts.research_prompt.clone(),
        }
    }

    /// Run the delegated research and prefix the answer with its metadata.
    pub async fn research(&self, topic: &str, platform_focus: &str) -> anyhow::Result<String> {
        let now = timestamp();
        let vars = HashMap::from([
            ("topic", topic.to_string()),
            ("platform_focus", platform_focus.to_string()),
            ("current_date", now.clone()),
        ]);
        let prompt = render_template("research_prompt", &self.template, &vars)?;

        info!(topic, platform_focus, "delegating topic research");
        let answer = self.runner.research(&prompt).await?;

        Ok(format!(
            "Research for: {topic}\nPlatform focus: {platform_focus}\nResearched at: {now}\n\n{answer}"
        ))
    }
}

#[async_trait]
impl Tool for ResearchTopicTool {
    fn name(&self) -> &str {
        "research_topic_for_content"
    }

    fn description(&self) -> &str {
        "Research a topic for content creation. Runs the research agent over web search and Reddit discussion and returns a brief with key facts, sentiment and content angles."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "topic": {
                    "type": "string",
                    "description": "Topic to research"
                },
                "platform_focus": {
                    "type": "string",
                    "description": "Platforms the content is for, comma-separated (default: all)"
                }
            },
            "required": ["topic"]
        })
    }

    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<ToolOutput> {
        let topic = require_string(&params, "topic")?;
        let focus = optional_string(&params, "platform_focus").unwrap_or_else(|| "all".to_string());
        Ok(self.research(&topic, &focus).await?.into())
    }
}

// ─────────────────────────────────────────────
// research_trending_topics
// ─────────────────────────────────────────────

/// Finds what is currently trending in a category.
pub struct ResearchTrendingTool {
    runner: Arc<dyn ResearchRunner>,
    template: String,
}

impl ResearchTrendingTool {
    pub fn new(runner: Arc<dyn ResearchRunner>, prompts: &ToolPrompts) -> Self {
        Self {
            runner,
            template: prompts.trending_research_prompt.clone(),
        }
    }

    pub async fn research(&self, category: &str) -> anyhow::Result<String> {
        let now = timestamp();
        let vars = HashMap::from([
            ("category", category.to_string()),
            ("current_date", now.clone()),
        ]);
        let prompt = render_template("trending_research_prompt", &self.template, &vars)?;

        info!(category, "delegating trending research");
        let answer = self.runner.research(&prompt).await?;

        Ok(format!("Trending in: {category}\nResearched at: {now}\n\n{answer}"))
    }
}

#[async_trait]
impl Tool for ResearchTrendingTool {
    fn name(&self) -> &str {
        "research_trending_topics"
    }

    fn description(&self) -> &str {
        "Research what is trending right now in a category and propose a content angle for each trend."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "description": "Category to scan, e.g. technology or fitness (default: general)"
                }
            },
            "required": []
        })
    }

    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<ToolOutput> {
        let category = optional_string(&params, "category").unwrap_or_else(|| "general".to_string());
        Ok(self.research(&category).await?.into())
    }
}
