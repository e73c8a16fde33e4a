//! Shared types for Trendscribe: conversation turns, configuration, run
//! records and the append-only run log.

pub mod config;
pub mod error;
pub mod logstore;
pub mod run;
pub mod types;
pub mod utils;
