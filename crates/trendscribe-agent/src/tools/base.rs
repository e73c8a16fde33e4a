//! Tool trait — the interface every agent tool implements.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use trendscribe_core::types::ToolDefinition;

// ─────────────────────────────────────────────
// Tool output
// ─────────────────────────────────────────────

/// What a tool hands back to the turn loop.
#[derive(Clone, Debug, PartialEq)]
pub enum ToolOutput {
    /// Fed back verbatim.
    Text(String),
    /// Fed back as a pretty-printed JSON array.
    Records(Vec<Value>),
}

impl ToolOutput {
    /// Serialize for a `tool` turn.
    pub fn into_content(self) -> String {
        match self {
            ToolOutput::Text(text) => text,
            ToolOutput::Records(records) => {
                serde_json::to_string_pretty(&records).unwrap_or_else(|_| "[]".to_string())
            }
        }
    }
}

impl From<String> for ToolOutput {
    fn from(text: String) -> Self {
        ToolOutput::Text(text)
    }
}

impl From<&str> for ToolOutput {
    fn from(text: &str) -> Self {
        ToolOutput::Text(text.to_string())
    }
}

// ─────────────────────────────────────────────
// Tool trait
// ─────────────────────────────────────────────

/// Every agent tool implements this trait.
///
/// The turn loop sends their schemas to the LLM via `to_definition()`, and
/// dispatches calls via `execute()`.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name used by the LLM to call this tool (e.g. `"search_subreddits"`).
    fn name(&self) -> &str;

    /// Description shown to the LLM; it decides when to call the tool from this.
    fn description(&self) -> &str;

    /// JSON Schema describing the parameters.
    ///
    /// Must be `{"type": "object", "properties": {...}, "required": [...]}`.
    /// Defaults are stated in the descriptions and applied by the tool.
    fn parameters(&self) -> Value;

    /// Execute the tool with the given arguments.
    ///
    /// On failure, return an `Err` — the registry converts it to an error
    /// string for the LLM.
    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<ToolOutput>;

    /// Build the `ToolDefinition` sent to the LLM.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.parameters())
    }
}

// ─────────────────────────────────────────────
// Param helpers
// ─────────────────────────────────────────────

/// Extract a required `String` param, returning a user-friendly error.
pub fn require_string(params: &HashMap<String, Value>, key: &str) -> anyhow::Result<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow::anyhow!("Missing required parameter: {key}"))
}

/// Extract an optional `String` param. Empty strings count as absent.
pub fn optional_string(params: &HashMap<String, Value>, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Extract an optional integer param. Integral floats and numeric strings
/// are accepted since models send both.
pub fn optional_i64(params: &HashMap<String, Value>, key: &str) -> Option<i64> {
    let value = params.get(key)?;
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_require_string_present() {
        let mut params = HashMap::new();
        params.insert("topic".into(), json!("rust"));
        assert_eq!(require_string(&params, "topic").unwrap(), "rust");
    }

    #[test]
    fn test_require_string_missing_or_wrong_type() {
        let mut params = HashMap::new();
        assert!(require_string(&params, "topic").is_err());
        params.insert("topic".into(), json!(42));
        let err = require_string(&params, "topic").unwrap_err();
        assert_eq!(err.to_string(), "Missing required parameter: topic");
    }

    #[test]
    fn test_optional_string_empty_is_none() {
        let mut params = HashMap::new();
        params.insert("style".into(), json!(""));
        params.insert("tone".into(), json!("warm"));
        assert_eq!(optional_string(&params, "style"), None);
        assert_eq!(optional_string(&params, "tone"), Some("warm".into()));
    }

    #[test]
    fn test_optional_i64_lenient() {
        let mut params = HashMap::new();
        params.insert("a".into(), json!(5));
        params.insert("b".into(), json!(3.0));
        params.insert("c".into(), json!("7"));
        params.insert("d".into(), json!(2.5));
        assert_eq!(optional_i64(&params, "a"), Some(5));
        assert_eq!(optional_i64(&params, "b"), Some(3));
        assert_eq!(optional_i64(&params, "c"), Some(7));
        assert_eq!(optional_i64(&params, "d"), None);
        assert_eq!(optional_i64(&params, "missing"), None);
    }

    #[test]
    fn test_output_serialization() {
        assert_eq!(ToolOutput::from("plain").into_content(), "plain");

        let records = ToolOutput::Records(vec![json!({"name": "rust"})]);
        let content = records.into_content();
        assert!(content.starts_with("[\n"));
        let parsed: Vec<Value> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed[0]["name"], "rust");

        assert_eq!(ToolOutput::Records(vec![]).into_content(), "[]");
    }

    #[tokio::test]
    async fn test_to_definition_default() {
        struct DummyTool;

        #[async_trait]
        impl Tool for DummyTool {
            fn name(&self) -> &str { "dummy" }
            fn description(&self) -> &str { "A test tool" }
            fn parameters(&self) -> Value {
                json!({"type": "object", "properties": {}, "required": []})
            }
            async fn execute(&self, _params: HashMap<String, Value>) -> anyhow::Result<ToolOutput> {
                Ok("ok".into())
            }
        }

        let def = DummyTool.to_definition();
        assert_eq!(def.function.name, "dummy");
        assert_eq!(def.tool_type, "function");
        assert_eq!(DummyTool.execute(HashMap::new()).await.unwrap(), ToolOutput::from("ok"));
    }
}
