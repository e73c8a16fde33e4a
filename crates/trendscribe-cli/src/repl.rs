//! Interactive REPL over either agent.
//!
//! Uses `rustyline` for readline-style editing with persistent history.

use anyhow::Result;
use rustyline::config::Configurer;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use tracing::debug;

use trendscribe_agent::{ContentAgent, ResearchAgent};

use crate::helpers;

/// Exit commands (case-insensitive match).
const EXIT_COMMANDS: &[&str] = &["exit", "quit", "/exit", "/quit", ":q"];

/// The agent a chat session talks to.
pub enum ChatAgent {
    Research(ResearchAgent),
    Content(ContentAgent),
}

impl ChatAgent {
    pub async fn chat(&mut self, message: &str) -> String {
        match self {
            ChatAgent::Research(agent) => agent.chat(message).await,
            ChatAgent::Content(agent) => agent.chat(message).await,
        }
    }

    pub fn session_id(&self) -> &str {
        match self {
            ChatAgent::Research(agent) => agent.session_id(),
            ChatAgent::Content(agent) => agent.session_id(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChatAgent::Research(_) => "Research",
            ChatAgent::Content(_) => "Content",
        }
    }
}

/// Run the interactive REPL loop.
pub async fn run(mut agent: ChatAgent) -> Result<()> {
    helpers::print_banner(agent.label(), agent.session_id());

    let mut editor = create_editor()?;

    loop {
        let input = match editor.readline("You: ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => break,
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }

        if is_exit_command(trimmed) {
            println!("\nGoodbye!");
            break;
        }

        let _ = editor.add_history_entry(&input);

        debug!(session = agent.session_id(), input = trimmed, "processing input");
        helpers::print_thinking();
        let response = agent.chat(trimmed).await;
        helpers::clear_thinking();
        helpers::print_response(agent.label(), &response);
    }

    save_history(&mut editor);

    Ok(())
}

/// Create a rustyline editor with history.
fn create_editor() -> Result<Editor<(), DefaultHistory>> {
    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(1000)?;

    let history_path = history_path();
    if history_path.exists() {
        let _ = editor.load_history(&history_path);
        debug!("loaded REPL history from {}", history_path.display());
    }

    Ok(editor)
}

/// Save history to disk.
fn save_history(editor: &mut Editor<(), DefaultHistory>) {
    let path = history_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = editor.save_history(&path) {
        debug!("failed to save history: {e}");
    }
}

/// Path to the history file.
fn history_path() -> std::path::PathBuf {
    trendscribe_core::utils::get_data_path()
        .join("history")
        .join("cli_history")
}

/// Check if input is an exit command.
fn is_exit_command(input: &str) -> bool {
    let lower = input.to_lowercase();
    EXIT_COMMANDS.contains(&lower.as_str())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_commands() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("QUIT"));
        assert!(is_exit_command(":q"));
        assert!(!is_exit_command("what's trending?"));
        assert!(!is_exit_command(""));
    }

    #[test]
    fn history_path_under_data_dir() {
        let path = history_path();
        assert!(path.to_string_lossy().contains(".trendscribe"));
        assert!(path.ends_with("history/cli_history"));
    }
}
