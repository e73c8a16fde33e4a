//! Trendscribe CLI — entry point.
//!
//! # Commands
//!
//! - `trendscribe chat [-m MESSAGE] [--agent research|content]` — single-shot or REPL
//! - `trendscribe create -t TOPIC -p youtube,article` — run the content pipeline
//! - `trendscribe trending [-c CATEGORY]` — research current trends
//! - `trendscribe analyze --platform x --file draft.txt` — post-or-trash verdict
//! - `trendscribe analytics` / `trendscribe logs` — inspect the run logs
//! - `trendscribe config` — show the effective configuration and presets

mod config_cmd;
mod helpers;
mod logs_cmd;
mod repl;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use trendscribe_agent::{open_log_set, ContentAgent, ResearchAgent};
use trendscribe_core::config::{load_config, Config, Credentials, Preset};
use trendscribe_core::run::ContentRequest;
use trendscribe_providers::{HttpProvider, LlmProvider, DEFAULT_TIMEOUT};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Trendscribe — research trending topics and turn them into platform-ready content
#[derive(Parser)]
#[command(name = "trendscribe", version, about, long_about = None)]
struct Cli {
    /// Apply a configuration preset (viral_focused, educational_focused, conservative, creative)
    #[arg(long, global = true)]
    preset: Option<Preset>,

    /// Enable debug logging
    #[arg(long, global = true, default_value_t = false)]
    logs: bool,

    /// Config file (default: ~/.trendscribe/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AgentKind {
    Research,
    Content,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with an agent (single-shot or interactive REPL)
    Chat {
        /// Single message (non-interactive). Omit for REPL mode.
        #[arg(short, long)]
        message: Option<String>,

        /// Which agent to talk to
        #[arg(short, long, value_enum, default_value_t = AgentKind::Research)]
        agent: AgentKind,
    },

    /// Research a topic and generate content for each platform
    Create {
        /// Topic to create content about
        #[arg(short, long)]
        topic: String,

        /// Comma-separated platforms: youtube, tiktok, article, x
        #[arg(short, long, default_value = "youtube,tiktok,article,x")]
        platforms: String,

        /// Content type (educational, how-to, storytelling, news, review, comparison)
        #[arg(long, default_value = "educational")]
        content_type: String,

        /// Tone name or free-form tone description
        #[arg(long, default_value = "conversational")]
        tone: String,

        /// Target duration for video platforms, e.g. 45s
        #[arg(long)]
        duration: Option<String>,
    },

    /// Research what is trending in a category
    Trending {
        #[arg(short, long, default_value = "general")]
        category: String,
    },

    /// Judge whether a piece of content is ready to post
    Analyze {
        /// Platform the content is for
        #[arg(short, long)]
        platform: String,

        /// Read the content from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Content passed inline
        #[arg(long)]
        text: Option<String>,
    },

    /// Show usage statistics from the run logs
    Analytics {
        /// Which agent's logs to read
        #[arg(short, long, value_enum, default_value_t = AgentKind::Content)]
        agent: AgentKind,
    },

    /// Query or clear the run logs
    Logs(logs_cmd::LogsArgs),

    /// Show the effective configuration
    Config(config_cmd::ConfigArgs),
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(cli.logs);

    let config = effective_config(cli.config.as_deref(), cli.preset);

    match cli.command {
        Commands::Chat { message, agent } => run_chat(&config, message, agent).await,
        Commands::Create {
            topic,
            platforms,
            content_type,
            tone,
            duration,
        } => {
            let mut request = ContentRequest::new(topic, helpers::parse_platforms(&platforms));
            request.content_type = content_type;
            request.tone = tone;
            request.duration = duration;
            run_create(&config, request).await
        }
        Commands::Trending { category } => {
            let agent = build_content_agent(&config)?;
            helpers::print_thinking();
            let report = agent.research_trending(&category).await;
            helpers::clear_thinking();
            helpers::print_response("Trending", &report);
            Ok(())
        }
        Commands::Analyze { platform, file, text } => {
            let content = match (file, text) {
                (Some(path), _) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                (None, Some(text)) => text,
                (None, None) => anyhow::bail!("pass the content with --file or --text"),
            };
            let agent = build_content_agent(&config)?;
            helpers::print_thinking();
            let verdict = agent.analyze_content(&content, &platform).await;
            helpers::clear_thinking();
            helpers::print_response("Verdict", &verdict);
            Ok(())
        }
        Commands::Analytics { agent } => logs_cmd::analytics(&config, agent),
        Commands::Logs(args) => logs_cmd::run(&config, args),
        Commands::Config(args) => config_cmd::run(&config, cli.config.as_deref(), args),
    }
}

/// Loaded config with the optional preset applied.
fn effective_config(path: Option<&std::path::Path>, preset: Option<Preset>) -> Config {
    let config = load_config(path);
    match preset {
        Some(preset) => {
            info!(preset = %preset, "applying preset");
            config.with_preset(preset)
        }
        None => config,
    }
}

// ─────────────────────────────────────────────
// Agent construction
// ─────────────────────────────────────────────

fn build_provider(config: &Config) -> Result<Arc<dyn LlmProvider>> {
    let provider = HttpProvider::gemini(
        &config.providers.gemini,
        &config.research.model.name,
        DEFAULT_TIMEOUT,
    )
    .context("failed to create the reasoning backend client")?;
    Ok(Arc::new(provider))
}

pub fn build_research_agent(config: &Config) -> Result<ResearchAgent> {
    let credentials = Credentials::from_config(config)?;
    let provider = build_provider(config)?;
    let logs = open_log_set(&config.paths.logs_dir, &config.research.logging, "cli");
    Ok(ResearchAgent::new(config, &credentials, provider, logs))
}

pub fn build_content_agent(config: &Config) -> Result<ContentAgent> {
    let credentials = Credentials::from_config(config)?;
    let provider = build_provider(config)?;
    let logs = open_log_set(&config.paths.logs_dir, &config.content.logging, "cli");
    Ok(ContentAgent::new(config, &credentials, provider, logs))
}

// ─────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────

async fn run_chat(config: &Config, message: Option<String>, kind: AgentKind) -> Result<()> {
    let mut agent = match kind {
        AgentKind::Research => repl::ChatAgent::Research(build_research_agent(config)?),
        AgentKind::Content => repl::ChatAgent::Content(build_content_agent(config)?),
    };

    match message {
        Some(msg) => {
            info!(session = agent.session_id(), "processing single message");
            let response = agent.chat(&msg).await;
            helpers::print_response(agent.label(), &response);
        }
        None => repl::run(agent).await?,
    }
    Ok(())
}

async fn run_create(config: &Config, request: ContentRequest) -> Result<()> {
    if request.platforms.is_empty() {
        anyhow::bail!("no platforms given");
    }
    let mut agent = build_content_agent(config)?;

    helpers::print_thinking();
    let result = agent.create_content(request).await;
    helpers::clear_thinking();

    helpers::print_content_result(&result);
    if let Some(error) = &result.error {
        anyhow::bail!("content creation finished with errors: {error}");
    }
    Ok(())
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("trendscribe=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
