//! Shared CLI helpers — response printing, banners, argument parsing.

use colored::Colorize;

use trendscribe_core::logstore::LogAnalytics;
use trendscribe_core::run::ContentResult;

/// Split a comma-separated platform list, lower-cased, empties dropped.
pub fn parse_platforms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Print an agent response to stdout.
pub fn print_response(label: &str, response: &str) {
    println!();
    println!("{}", label.cyan().bold());
    if response.is_empty() {
        println!("{}", "(no response)".dimmed());
    } else {
        println!("{response}");
    }
    println!();
}

/// Print the banner shown at REPL start.
pub fn print_banner(agent: &str, session_id: &str) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!(
        "{}  v{}  {}",
        "Trendscribe".cyan().bold(),
        version.dimmed(),
        format!("{agent} agent · session {session_id}").dimmed()
    );
    println!("{}", "Type a message, or \"exit\" to quit.".dimmed());
    println!();
}

/// Print a "thinking" placeholder while an agent works.
pub fn print_thinking() {
    eprint!("{}", "⠿ thinking...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

/// Summarize a pipeline result: saved files, then any error.
pub fn print_content_result(result: &ContentResult) {
    println!();
    println!(
        "{} {}",
        "Content for".cyan().bold(),
        result.topic.bold()
    );
    println!(
        "  {}",
        format!("{} · {} · {}", result.content_type, result.tone, result.generated_at).dimmed()
    );

    if result.content.is_empty() {
        println!("  {}", "(nothing generated)".dimmed());
    }
    for (platform, text) in &result.content {
        let saved = match result.files.get(platform) {
            Some(path) => format!("{} {path}", "✓".green()),
            None => format!("{}", "not saved".yellow()),
        };
        println!("  {:<10} {:>6} chars  {}", platform.bold(), text.chars().count(), saved);
    }

    if let Some(error) = &result.error {
        println!();
        println!("  {} {error}", "Error:".red().bold());
    }
    println!();
}

/// Print log analytics as an aligned table.
pub fn print_analytics(stats: &LogAnalytics) {
    println!();
    println!("{}", "Usage analytics".cyan().bold());
    println!();

    let rows = [
        ("Entries:", stats.total_entries.to_string()),
        ("Content created:", stats.total_content_created.to_string()),
        ("Chat runs:", stats.total_chat_runs.to_string()),
        ("Research calls:", stats.total_research_calls.to_string()),
        ("Errors:", format!("{} ({}%)", stats.total_errors, stats.error_rate)),
        ("Avg latency:", format!("{}s", stats.average_latency_secs)),
        ("Avg tokens:", format!("{}", stats.average_token_usage)),
        ("First log:", stats.first_log.clone().unwrap_or_else(|| "-".into())),
        ("Last log:", stats.last_log.clone().unwrap_or_else(|| "-".into())),
    ];
    for (label, value) in rows {
        println!("  {:<18} {}", label.bold(), value);
    }

    for (title, dist) in [
        ("Platforms:", &stats.platform_distribution),
        ("Content types:", &stats.content_type_distribution),
    ] {
        if dist.is_empty() {
            continue;
        }
        println!();
        println!("  {}", title.bold());
        for (name, count) in dist {
            println!("    {:<16} {}", name, count);
        }
    }
    println!();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_platforms_trims_and_lowercases() {
        assert_eq!(parse_platforms("YouTube, x ,,article"), vec!["youtube", "x", "article"]);
    }

    #[test]
    fn parse_platforms_empty() {
        assert!(parse_platforms(" , ").is_empty());
    }
}
