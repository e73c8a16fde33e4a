//! Summary statistics over log entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::record::{LogEntry, LogKind};

/// Aggregates computed from one or more log stores.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LogAnalytics {
    pub total_entries: usize,
    pub total_content_created: usize,
    pub total_chat_runs: usize,
    pub total_research_calls: usize,
    /// Failed runs plus standalone `error` entries.
    pub total_errors: usize,
    /// Percentage of errors relative to runs.
    pub error_rate: f64,
    pub platform_distribution: BTreeMap<String, usize>,
    pub content_type_distribution: BTreeMap<String, usize>,
    pub average_latency_secs: f64,
    pub average_token_usage: f64,
    pub first_log: Option<String>,
    pub last_log: Option<String>,
}

impl LogAnalytics {
    pub fn from_entries(entries: &[LogEntry]) -> Self {
        let mut stats = LogAnalytics {
            total_entries: entries.len(),
            ..Default::default()
        };

        let mut latencies = Vec::new();
        let mut tokens = Vec::new();
        let mut failed_runs = 0usize;
        let mut error_entries = 0usize;

        for entry in entries {
            let data = &entry.data;
            match entry.log_type {
                LogKind::ContentCreation => {
                    stats.total_content_created += 1;
                    let input = &data["input"];
                    for platform in input["platforms"].as_array().into_iter().flatten() {
                        let name = platform.as_str().unwrap_or("unknown").to_string();
                        *stats.platform_distribution.entry(name).or_default() += 1;
                    }
                    let content_type = input["content_type"].as_str().unwrap_or("unknown");
                    *stats
                        .content_type_distribution
                        .entry(content_type.to_string())
                        .or_default() += 1;
                }
                LogKind::ContentRun | LogKind::ResearchRun => stats.total_chat_runs += 1,
                LogKind::Research => stats.total_research_calls += 1,
                LogKind::Error => error_entries += 1,
                LogKind::ToolUsage | LogKind::Performance => {}
            }

            if entry.log_type.is_run() {
                if data["success"].as_bool() == Some(false) {
                    failed_runs += 1;
                }
                if let Some(latency) = data["latency_secs"].as_f64() {
                    latencies.push(latency);
                }
                if let Some(used) = data["token_usage"].as_f64() {
                    tokens.push(used);
                }
            }
        }

        // A failed pipeline run can also have an `error` entry in the same set;
        // count the larger of the two so one failure is not counted twice.
        stats.total_errors = failed_runs.max(error_entries);
        let total_runs = stats.total_content_created + stats.total_chat_runs;
        stats.error_rate = round_to(stats.total_errors as f64 / total_runs.max(1) as f64 * 100.0, 2);
        stats.average_latency_secs = round_to(mean(&latencies), 3);
        stats.average_token_usage = mean(&tokens).round();

        let mut stamps: Vec<&str> = entries.iter().map(|e| e.timestamp.as_str()).collect();
        stamps.sort_unstable();
        stats.first_log = stamps.first().map(|s| s.to_string());
        stats.last_log = stamps.last().map(|s| s.to_string());

        stats
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
