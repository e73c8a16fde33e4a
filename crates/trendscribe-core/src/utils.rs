//! Utility helpers — path resolution, timestamps, topic sanitization.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

/// Characters that survive sanitization: word characters, whitespace, hyphens.
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("static regex"));

/// Runs of separators collapsed into a single underscore.
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_-]+").expect("static regex"));

/// Get the Trendscribe data directory (e.g. `~/.trendscribe/`).
pub fn get_data_path() -> PathBuf {
    let home = home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".trendscribe")
}

/// Default directory for run logs (e.g. `~/.trendscribe/logs/`).
pub fn get_logs_path() -> PathBuf {
    get_data_path().join("logs")
}

/// Current ISO 8601 timestamp (UTC).
pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Short random session identifier (8 hex chars).
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Truncate a string to `max_len` characters. Unicode-safe, no ellipsis.
pub fn truncate_chars(s: &str, max_len: usize) -> String {
    s.chars().take(max_len).collect()
}

/// Turn a free-form topic into a filename stem.
///
/// Lower-cases, drops anything that is not a word character, whitespace or
/// hyphen, then collapses separator runs to one `_`. Idempotent.
pub fn sanitize_topic(topic: &str) -> String {
    let lower = topic.to_lowercase();
    let kept = DISALLOWED.replace_all(&lower, "");
    let collapsed = SEPARATORS.replace_all(&kept, "_");
    let trimmed = collapsed.trim_matches('_');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Expand `~` to the home directory in a path string.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(rest)
    } else if path == "~" {
        home_dir().unwrap_or_else(|| PathBuf::from("."))
    } else {
        PathBuf::from(path)
    }
}

fn home_dir() -> Option<PathBuf> {
    dirs_next::home_dir()
}
