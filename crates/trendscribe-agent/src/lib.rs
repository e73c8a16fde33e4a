//! Trendscribe Agent — turn loop, tools, and the two agents.
//!
//! This crate contains:
//! - **tools**: Tool trait, registry, and the research/content tools
//! - **turn_loop**: The LLM ↔ tool-calling loop shared by both agents
//! - **run**: Logged top-level invocations
//! - **research_agent** / **content_agent**: The agents themselves

pub mod tools;
pub mod turn_loop;
pub mod run;
pub mod writer;
pub mod research_agent;
pub mod content_agent;

#[cfg(test)]
mod testing;

pub use content_agent::ContentAgent;
pub use research_agent::{ResearchAgent, ResearchAgentFactory};
pub use run::open_log_set;
pub use tools::{Tool, ToolOutput, ToolRegistry};
pub use turn_loop::{LoopError, TurnLoop, TurnOutcome};
