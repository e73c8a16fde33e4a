use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::base::{Tool, ToolOutput};

/// Returns the current UTC timestamp.
pub struct CurrentDateTool;

#[async_trait]
impl Tool for CurrentDateTool {
    fn name(&self) -> &str {
        "get_current_date"
    }

    fn description(&self) -> &str {
        "Returns the current date and time (UTC) in ISO 8601 format."
    }

    fn parameters(&self) -> Value {
        json!({"type": "object", "properties": {}, "required": []})
    }

    async fn execute(&self, _params: HashMap<String, Value>) -> anyhow::Result<ToolOutput> {
        Ok(trendscribe_core::utils::timestamp().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_rfc3339() {
        let ToolOutput::Text(out) = CurrentDateTool.execute(HashMap::new()).await.unwrap() else {
            panic!("expected text");
        };
        chrono::DateTime::parse_from_rfc3339(&out).unwrap();
    }
}
