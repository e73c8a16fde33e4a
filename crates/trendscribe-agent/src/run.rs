//! Top-level invocation wrapper: time a loop run and write exactly one
//! run record, whatever the outcome.

use std::time::Instant;

use tracing::{error, info, warn};

use trendscribe_core::config::LoggingConfig;
use trendscribe_core::logstore::{LogKind, LogSet};
use trendscribe_core::run::{RunInput, RunRecord};
use trendscribe_core::types::Message;
use trendscribe_core::utils::expand_home;

use crate::turn_loop::{tool_summaries, TurnLoop};

/// Prefix of the answer returned when a run fails.
pub const ERROR_PREFIX: &str = "[ERROR]";

/// Open an agent's log stores under `logs_dir`.
///
/// A store that cannot be opened disables logging for the agent.
pub fn open_log_set(logs_dir: &str, logging: &LoggingConfig, session_id: &str) -> Option<LogSet> {
    let dir = expand_home(logs_dir);
    match LogSet::open(&dir, logging, session_id) {
        Ok(logs) => logs,
        Err(e) => {
            warn!(dir = %dir.display(), "Run logging disabled: {}", e);
            None
        }
    }
}

/// Full error chain, one cause per line.
pub fn error_chain(err: impl Into<anyhow::Error>) -> String {
    format!("{:?}", err.into())
}

/// Run `turn_loop` over `memory` and log the outcome as `kind`.
///
/// Never fails: errors come back as `"[ERROR] <message>"`.
pub async fn run_logged(
    turn_loop: &TurnLoop,
    memory: &mut Vec<Message>,
    input: RunInput,
    kind: LogKind,
    logs: Option<&LogSet>,
    session_id: &str,
) -> String {
    let started = Instant::now();
    let mut record = RunRecord::start(input, session_id);
    let first_new = memory.len();

    match turn_loop.run(memory).await {
        Ok(outcome) => {
            record.answer = outcome.answer;
            record.tool_calls = outcome.tool_calls;
            record.token_usage = outcome.token_usage;
            record.success = true;
        }
        Err(e) => {
            error!(session = session_id, error = %e, "run failed");
            record.answer = format!("{ERROR_PREFIX} {e}");
            record.tool_calls = tool_summaries(&memory[first_new..]);
            record.error = Some(error_chain(e));
        }
    }

    record.set_latency(started.elapsed());
    info!(
        session = session_id,
        kind = %kind,
        success = record.success,
        tool_calls = record.tool_calls.len(),
        latency_secs = record.latency_secs,
        "run finished"
    );

    if let Some(logs) = logs {
        logs.record(kind, &record);
    }
    record.answer
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::testing::{tool_call_response, MockProvider, RecordingTool};
    use crate::tools::ToolRegistry;
    use tempfile::TempDir;
    use trendscribe_core::types::LlmResponse;
    use trendscribe_providers::LlmRequestConfig;

    fn logs(dir: &TempDir) -> LogSet {
        let logging = LoggingConfig {
            log_file: "runs.jsonl".into(),
            ..Default::default()
        };
        LogSet::open(dir.path(), &logging, "sess0001").unwrap().unwrap()
    }

    fn make_loop(provider: MockProvider, max_rounds: usize) -> TurnLoop {
        TurnLoop::new(
            Arc::new(provider),
            ToolRegistry::new().with(Arc::new(RecordingTool::default())),
            "system",
            "mock-model",
            LlmRequestConfig::default(),
        )
        .with_max_rounds(max_rounds)
    }

    #[tokio::test]
    async fn test_success_writes_one_record() {
        let dir = TempDir::new().unwrap();
        let logs = logs(&dir);
        let turn_loop = make_loop(
            MockProvider::new(vec![
                tool_call_response(&[("c1", "record", r#"{"label": "x"}"#)]),
                LlmResponse::text("final"),
            ]),
            5,
        );

        let mut memory = vec![Message::user("q")];
        let answer = run_logged(
            &turn_loop,
            &mut memory,
            RunInput::Message("q".into()),
            LogKind::ResearchRun,
            Some(&logs),
            "sess0001",
        )
        .await;

        assert_eq!(answer, "final");
        let entries = logs.runs.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        let record: RunRecord = serde_json::from_value(entries[0].data.clone()).unwrap();
        assert!(record.success);
        assert_eq!(record.tool_calls.len(), 1);
        assert_eq!(record.tool_calls[0].content, "recorded x");
        assert_eq!(record.input, RunInput::Message("q".into()));
        assert!(record.error.is_none());
    }

    #[tokio::test]
    async fn test_failure_writes_one_record() {
        let dir = TempDir::new().unwrap();
        let logs = logs(&dir);
        let turn_loop = make_loop(MockProvider::failing(), 5);

        let mut memory = vec![Message::user("q")];
        let answer = run_logged(
            &turn_loop,
            &mut memory,
            RunInput::Message("q".into()),
            LogKind::ContentRun,
            Some(&logs),
            "sess0001",
        )
        .await;

        assert!(answer.starts_with("[ERROR] reasoning backend failed"));
        let entries = logs.runs.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].log_type, LogKind::ContentRun);
        let record: RunRecord = serde_json::from_value(entries[0].data.clone()).unwrap();
        assert!(!record.success);
        // Full chain includes the backend cause.
        assert!(record.error.unwrap().contains("backend down"));
    }

    #[tokio::test]
    async fn test_round_limit_keeps_partial_tool_calls() {
        let dir = TempDir::new().unwrap();
        let logs = logs(&dir);
        let turn_loop = make_loop(
            MockProvider::new(vec![
                tool_call_response(&[("c1", "record", "{}")]),
                tool_call_response(&[("c2", "record", "{}")]),
            ]),
            2,
        );

        let mut memory = vec![Message::user("q")];
        let answer = run_logged(
            &turn_loop,
            &mut memory,
            RunInput::Message("q".into()),
            LogKind::ResearchRun,
            Some(&logs),
            "sess0001",
        )
        .await;

        assert_eq!(answer, "[ERROR] no final answer after 2 rounds");
        let entries = logs.runs.read_all().unwrap();
        let record: RunRecord = serde_json::from_value(entries[0].data.clone()).unwrap();
        assert_eq!(record.tool_calls.len(), 2);
    }

    #[test]
    fn test_open_log_set_disabled_and_enabled() {
        let dir = TempDir::new().unwrap();
        let logs_dir = dir.path().join("nested").to_string_lossy().into_owned();

        let disabled = LoggingConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(open_log_set(&logs_dir, &disabled, "s").is_none());

        let logs = open_log_set(&logs_dir, &LoggingConfig::default(), "s").unwrap();
        assert!(logs.runs.path().exists());
        assert!(logs.errors.is_none());
    }

    #[tokio::test]
    async fn test_without_logs() {
        let turn_loop = make_loop(MockProvider::simple("hi"), 5);
        let mut memory = vec![Message::user("q")];
        let answer = run_logged(
            &turn_loop,
            &mut memory,
            RunInput::Message("q".into()),
            LogKind::ResearchRun,
            None,
            "s",
        )
        .await;
        assert_eq!(answer, "hi");
    }
}
