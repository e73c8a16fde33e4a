//! Tool modules for the Trendscribe agents.

pub mod base;
pub mod registry;
pub mod reddit;
pub mod grounded;
pub mod date;
pub mod research;
pub mod generate;
pub mod files;

pub use base::{Tool, ToolOutput, require_string, optional_string, optional_i64};
pub use registry::ToolRegistry;
