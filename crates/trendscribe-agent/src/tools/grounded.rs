//! Grounded web search through Gemini's `google_search` tool.

use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use trendscribe_core::config::schema::GeminiConfig;

use super::base::{require_string, Tool, ToolOutput};

/// Searches the web via a grounded `generateContent` call.
pub struct GoogleGroundingSearchTool {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl GoogleGroundingSearchTool {
    pub fn new(config: &GeminiConfig, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            api_base: config.native_api_base.trim_end_matches('/').to_string(),
            model: config.grounding_model.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(body: &Value) -> String {
    body["candidates"][0]["content"]["parts"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|part| part["text"].as_str())
        .collect::<Vec<_>>()
        .join("")
        .trim()
        .to_string()
}

#[async_trait]
impl Tool for GoogleGroundingSearchTool {
    fn name(&self) -> &str {
        "google_grounding_search"
    }

    fn description(&self) -> &str {
        "Search for current information using Google's grounded search. Use it for recent news, events, prices or facts that may be newer than your training data. Be specific in the query."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Specific, focused search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<ToolOutput> {
        let query = require_string(&params, "query")?;
        if self.api_key.trim().is_empty() {
            anyhow::bail!("GEMINI_API_KEY not set");
        }

        debug!(query = %query, model = %self.model, "grounded search");

        let body = json!({
            "contents": [{
                "parts": [{ "text": format!("Search for and provide current information about: {query}") }]
            }],
            "tools": [{ "google_search": {} }]
        });

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("Grounded search request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Grounded search returned {status}: {text}");
        }

        let body: Value = resp
            .json()
            .await
            .context("Failed to parse grounded search response")?;

        let text = extract_text(&body);
        if text.is_empty() {
            return Ok("No results found from grounded search".into());
        }
        Ok(format!("Current Information (via Google Search):\n{text}").into())
    }
}
