use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind tag of a log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    /// Research Agent chat run.
    ResearchRun,
    /// Content Agent free-form chat run.
    ContentRun,
    /// One `create_content` pipeline call.
    ContentCreation,
    /// Research delegation made by the Content Agent.
    Research,
    ToolUsage,
    Error,
    Performance,
}

impl LogKind {
    pub const ALL: [LogKind; 7] = [
        LogKind::ResearchRun,
        LogKind::ContentRun,
        LogKind::ContentCreation,
        LogKind::Research,
        LogKind::ToolUsage,
        LogKind::Error,
        LogKind::Performance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogKind::ResearchRun => "research_run",
            LogKind::ContentRun => "content_run",
            LogKind::ContentCreation => "content_creation",
            LogKind::Research => "research",
            LogKind::ToolUsage => "tool_usage",
            LogKind::Error => "error",
            LogKind::Performance => "performance",
        }
    }

    /// Kinds that hold a `RunRecord` payload.
    pub fn is_run(self) -> bool {
        matches!(
            self,
            LogKind::ResearchRun | LogKind::ContentRun | LogKind::ContentCreation
        )
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown log type '{s}'"))
    }
}

/// One line of a log store.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    /// RFC 3339, UTC.
    pub timestamp: String,
    pub session_id: String,
    pub log_type: LogKind,
    pub data: serde_json::Value,
}

impl LogEntry {
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Filters for [`super::LogStore::query`]. Unset fields match everything.
#[derive(Clone, Debug, Default)]
pub struct LogQuery {
    pub kind: Option<LogKind>,
    pub session_id: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl LogQuery {
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if self.kind.is_some_and(|k| k != entry.log_type) {
            return false;
        }
        if let Some(session) = self.session_id.as_deref() {
            if entry.session_id != session {
                return false;
            }
        }
        if self.since.is_some() || self.until.is_some() {
            let Some(ts) = entry.parsed_timestamp() else {
                return false;
            };
            if self.since.is_some_and(|since| ts < since) {
                return false;
            }
            if self.until.is_some_and(|until| ts > until) {
                return false;
            }
        }
        true
    }
}
