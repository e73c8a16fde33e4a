//! Run records and content pipeline request/result types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Summary of one tool call made during a run.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ToolCallSummary {
    pub tool_name: String,
    pub tool_call_id: String,
    /// Serialized tool output as fed back to the model.
    pub content: String,
}

/// A request to the content pipeline.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ContentRequest {
    pub topic: String,
    pub platforms: Vec<String>,
    pub content_type: String,
    pub tone: String,
    /// Target duration for video platforms; the platform spec applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl ContentRequest {
    pub fn new(topic: impl Into<String>, platforms: Vec<String>) -> Self {
        Self {
            topic: topic.into(),
            platforms,
            content_type: "educational".to_string(),
            tone: "conversational".to_string(),
            duration: None,
        }
    }
}

/// Output of one `create_content` call. Partially filled on failure.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ContentResult {
    pub topic: String,
    pub content_type: String,
    pub tone: String,
    pub generated_at: String,
    /// Platform → generated text.
    pub content: BTreeMap<String, String>,
    /// Platform → saved file path.
    pub files: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContentResult {
    pub fn new(request: &ContentRequest) -> Self {
        Self {
            topic: request.topic.clone(),
            content_type: request.content_type.clone(),
            tone: request.tone.clone(),
            generated_at: crate::utils::timestamp(),
            content: BTreeMap::new(),
            files: BTreeMap::new(),
            error: None,
        }
    }
}

/// What a run was invoked with.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RunInput {
    Content(ContentRequest),
    Message(String),
}

/// One persisted outcome summary for a top-level invocation.
///
/// Built at start with empty outcome fields, filled in during the run and
/// written exactly once.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RunRecord {
    pub input: RunInput,
    pub tool_calls: Vec<ToolCallSummary>,
    pub answer: String,
    pub latency_secs: f64,
    pub token_usage: Option<u32>,
    pub error: Option<String>,
    pub success: bool,
    pub timestamp: String,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files_saved: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated: Option<ContentResult>,
}

impl RunRecord {
    pub fn start(input: RunInput, session_id: impl Into<String>) -> Self {
        Self {
            input,
            tool_calls: Vec::new(),
            answer: String::new(),
            latency_secs: 0.0,
            token_usage: None,
            error: None,
            success: false,
            timestamp: crate::utils::timestamp(),
            session_id: session_id.into(),
            files_saved: Vec::new(),
            generated: None,
        }
    }

    /// Record elapsed time, rounded to milliseconds.
    pub fn set_latency(&mut self, elapsed: std::time::Duration) {
        self.latency_secs = (elapsed.as_secs_f64() * 1000.0).round() / 1000.0;
    }

    /// Platforms requested, for content runs.
    pub fn platforms(&self) -> &[String] {
        match &self.input {
            RunInput::Content(req) => &req.platforms,
            RunInput::Message(_) => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_latency_rounded_to_millis() {
        let mut record = RunRecord::start(RunInput::Message("hi".into()), "abcd1234");
        record.set_latency(Duration::from_micros(1_234_567));
        assert_eq!(record.latency_secs, 1.235);
    }

    #[test]
    fn test_input_untagged_round_trip() {
        let req = ContentRequest::new("rust", vec!["article".into(), "x".into()]);
        let record = RunRecord::start(RunInput::Content(req.clone()), "s");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["input"]["topic"], "rust");
        assert!(json.get("files_saved").is_none());

        let back: RunRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.input, RunInput::Content(req));
        assert_eq!(back.platforms(), ["article", "x"]);

        let msg: RunInput = serde_json::from_value(serde_json::json!("hello")).unwrap();
        assert_eq!(msg, RunInput::Message("hello".into()));
    }

    #[test]
    fn test_content_result_from_request() {
        let mut req = ContentRequest::new("AI news", vec!["youtube".into()]);
        req.tone = "humorous".into();
        let result = ContentResult::new(&req);
        assert_eq!(result.tone, "humorous");
        assert!(result.content.is_empty() && result.files.is_empty());
        assert!(result.error.is_none());
    }
}
