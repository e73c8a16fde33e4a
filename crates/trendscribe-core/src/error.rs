//! Typed errors for configuration and the run log store.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or using configuration.
///
/// Missing credentials are fatal at agent construction.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    MissingCredential(String),

    #[error("unknown preset '{0}' (expected one of: viral_focused, educational_focused, conservative, creative)")]
    UnknownPreset(String),

    #[error("missing required variable '{variable}' for prompt '{template}'")]
    MissingTemplateVariable { template: String, variable: String },

    #[error("no output folder configured for platform '{0}'")]
    MissingOutputFolder(String),
}

/// Errors raised by [`crate::logstore::LogStore`].
#[derive(Debug, Error)]
pub enum LogStoreError {
    #[error("log store I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode log entry: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("log store lock poisoned")]
    Poisoned,
}
