//! `trendscribe logs` / `trendscribe analytics` — read the run logs.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;

use trendscribe_core::config::{Config, LoggingConfig};
use trendscribe_core::logstore::{LogEntry, LogKind, LogQuery, LogSet};
use trendscribe_core::utils::{expand_home, truncate_chars};

use crate::helpers;
use crate::AgentKind;

/// Characters of an entry's payload shown per line.
const PREVIEW_CHARS: usize = 120;

#[derive(Args, Debug)]
pub struct LogsArgs {
    /// Which agent's logs to read
    #[arg(short, long, value_enum, default_value_t = AgentKind::Content)]
    agent: AgentKind,

    /// Only entries of this type (e.g. content_creation, research, error)
    #[arg(short, long)]
    kind: Option<LogKind>,

    /// Only entries from this session
    #[arg(short, long)]
    session: Option<String>,

    /// Only entries at or after this RFC 3339 timestamp
    #[arg(long)]
    since: Option<DateTime<Utc>>,

    /// Only entries at or before this RFC 3339 timestamp
    #[arg(long)]
    until: Option<DateTime<Utc>>,

    /// Maximum number of entries
    #[arg(short, long, default_value_t = 20)]
    limit: usize,

    /// Print full entries as JSON lines
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Truncate the agent's log stores
    #[arg(long, default_value_t = false)]
    clear: bool,

    /// Confirm --clear
    #[arg(long, default_value_t = false, requires = "clear")]
    yes: bool,
}

impl LogsArgs {
    fn query(&self) -> LogQuery {
        LogQuery {
            kind: self.kind,
            session_id: self.session.clone(),
            since: self.since,
            until: self.until,
            limit: Some(self.limit),
        }
    }
}

fn logging_for(config: &Config, agent: AgentKind) -> &LoggingConfig {
    match agent {
        AgentKind::Research => &config.research.logging,
        AgentKind::Content => &config.content.logging,
    }
}

/// Open an agent's stores; `None` when its logging is disabled.
fn open(config: &Config, agent: AgentKind) -> Result<Option<LogSet>> {
    let dir = expand_home(&config.paths.logs_dir);
    LogSet::open(&dir, logging_for(config, agent), "cli")
        .with_context(|| format!("failed to open logs in {}", dir.display()))
}

pub fn run(config: &Config, args: LogsArgs) -> Result<()> {
    let Some(logs) = open(config, args.agent)? else {
        println!("{}", "Logging is disabled for this agent.".dimmed());
        return Ok(());
    };
    let stores = std::iter::once(&logs.runs).chain(logs.errors.as_ref());

    if args.clear {
        if !args.yes {
            println!("{}", "Refusing to clear logs without --yes.".yellow());
            return Ok(());
        }
        for store in stores {
            store.clear(true)?;
            println!("{} {}", "Cleared".green(), store.path().display());
        }
        return Ok(());
    }

    let query = args.query();
    let mut entries = Vec::new();
    for store in stores {
        entries.extend(store.query(&query)?);
    }
    // Merge the stores back into one newest-first list.
    entries.sort_by(|a, b| b.parsed_timestamp().cmp(&a.parsed_timestamp()));
    entries.truncate(args.limit);

    if entries.is_empty() {
        println!("{}", "No matching log entries.".dimmed());
        return Ok(());
    }
    for entry in &entries {
        if args.json {
            println!("{}", serde_json::to_string(entry)?);
        } else {
            println!("{}", format_entry(entry));
        }
    }
    Ok(())
}

pub fn analytics(config: &Config, agent: AgentKind) -> Result<()> {
    match open(config, agent)? {
        Some(logs) => helpers::print_analytics(&logs.analytics()?),
        None => println!("{}", "Logging is disabled for this agent.".dimmed()),
    }
    Ok(())
}

/// One-line summary: timestamp, session, kind, payload preview.
fn format_entry(entry: &LogEntry) -> String {
    let preview = truncate_chars(&entry.data.to_string(), PREVIEW_CHARS);
    let kind = if entry.log_type == LogKind::Error {
        entry.log_type.as_str().red().to_string()
    } else {
        entry.log_type.as_str().cyan().to_string()
    };
    format!(
        "{} {} {:<18} {}",
        entry.timestamp.dimmed(),
        entry.session_id.bold(),
        kind,
        preview
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_from_args() {
        let args = LogsArgs {
            agent: AgentKind::Research,
            kind: Some(LogKind::ResearchRun),
            session: Some("abcd1234".into()),
            since: None,
            until: None,
            limit: 5,
            json: false,
            clear: false,
            yes: false,
        };
        let query = args.query();
        assert_eq!(query.kind, Some(LogKind::ResearchRun));
        assert_eq!(query.session_id.as_deref(), Some("abcd1234"));
        assert_eq!(query.limit, Some(5));
    }

    #[test]
    fn format_entry_truncates_payload() {
        colored::control::set_override(false);
        let entry = LogEntry {
            timestamp: "2025-01-01T00:00:00+00:00".into(),
            session_id: "abcd1234".into(),
            log_type: LogKind::Research,
            data: json!({ "results_preview": "x".repeat(500) }),
        };
        let line = format_entry(&entry);
        assert!(line.starts_with("2025-01-01T00:00:00+00:00 abcd1234 research"));
        assert!(line.len() < 250);
    }

    #[test]
    fn logs_written_and_read_back() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.paths.logs_dir = dir.path().to_string_lossy().into_owned();

        let logs = open(&config, AgentKind::Content).unwrap().unwrap();
        logs.runs.append(LogKind::Research, &json!({"topic": "rust"})).unwrap();
        logs.record_error(&json!({"error": "boom"}));

        let entries = logs.runs.query(&LogQuery::default()).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(logs.errors.as_ref().unwrap().path().exists());
    }
}
