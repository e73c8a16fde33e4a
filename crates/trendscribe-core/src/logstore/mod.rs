//! Run logger — append-only JSON Lines stores and analytics.
//!
//! One file per concern. Each line is a [`LogEntry`]. Appending is the only
//! write in normal operation; [`LogStore::clear`] is the explicit exception.

pub mod analytics;
pub mod record;
pub mod store;

use std::path::Path;

use serde::Serialize;
use tracing::warn;

pub use analytics::LogAnalytics;
pub use record::{LogEntry, LogKind, LogQuery};
pub use store::LogStore;

use crate::config::LoggingConfig;
use crate::error::LogStoreError;

/// The stores one agent writes to: its run store and, optionally, a
/// dedicated error store.
#[derive(Clone, Debug)]
pub struct LogSet {
    pub runs: LogStore,
    pub errors: Option<LogStore>,
}

impl LogSet {
    /// Open the stores described by `logging` under `dir`.
    ///
    /// Returns `Ok(None)` when logging is disabled.
    pub fn open(
        dir: &Path,
        logging: &LoggingConfig,
        session_id: &str,
    ) -> Result<Option<Self>, LogStoreError> {
        if !logging.enabled {
            return Ok(None);
        }
        let runs = LogStore::open(dir, &logging.log_file, session_id)?;
        let errors = if logging.separate_error_log {
            Some(LogStore::open(dir, &logging.error_log_file, session_id)?)
        } else {
            None
        };
        Ok(Some(Self { runs, errors }))
    }

    /// Same files, different session tag.
    pub fn with_session(&self, session_id: &str) -> Self {
        Self {
            runs: self.runs.with_session(session_id),
            errors: self.errors.as_ref().map(|s| s.with_session(session_id)),
        }
    }

    /// Append to the run store. Failures are logged, never returned.
    pub fn record(&self, kind: LogKind, data: &impl Serialize) {
        if let Err(e) = self.runs.append(kind, data) {
            warn!(kind = %kind, "Failed to write log entry: {}", e);
        }
    }

    /// Append an `error` entry to the error store (or the run store when
    /// there is no separate one). Failures are logged, never returned.
    pub fn record_error(&self, data: &impl Serialize) {
        let store = self.errors.as_ref().unwrap_or(&self.runs);
        if let Err(e) = store.append(LogKind::Error, data) {
            warn!("Failed to write error log entry: {}", e);
        }
    }

    /// Analytics over the run store and the error store together.
    pub fn analytics(&self) -> Result<LogAnalytics, LogStoreError> {
        let mut entries = self.runs.read_all()?;
        if let Some(errors) = &self.errors {
            entries.extend(errors.read_all()?);
        }
        Ok(LogAnalytics::from_entries(&entries))
    }
}
