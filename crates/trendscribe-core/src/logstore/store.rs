//! Append-only JSON Lines store.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::cmp::Reverse;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, warn};

use super::analytics::LogAnalytics;
use super::record::{LogEntry, LogKind, LogQuery};
use crate::error::LogStoreError;

struct StoreFile {
    path: PathBuf,
    /// Held across every write (and the truncate in `clear`).
    lock: Mutex<()>,
}

/// Handle to one JSONL log file, tagged with a session id.
///
/// Clones share the file lock, so several handles (e.g. with different
/// sessions via [`LogStore::with_session`]) can append safely.
#[derive(Clone)]
pub struct LogStore {
    file: Arc<StoreFile>,
    session_id: String,
}

impl LogStore {
    /// Open (creating if needed) `<dir>/<file_name>`.
    pub fn open(
        dir: &Path,
        file_name: &str,
        session_id: impl Into<String>,
    ) -> Result<Self, LogStoreError> {
        fs::create_dir_all(dir).map_err(|source| LogStoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = dir.join(file_name);
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LogStoreError::Io {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), "Opened log store");
        Ok(Self {
            file: Arc::new(StoreFile {
                path,
                lock: Mutex::new(()),
            }),
            session_id: session_id.into(),
        })
    }

    /// Same file, different session tag.
    pub fn with_session(&self, session_id: impl Into<String>) -> Self {
        Self {
            file: Arc::clone(&self.file),
            session_id: session_id.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file.path
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Append one entry as a single JSON line.
    pub fn append(&self, kind: LogKind, data: &impl Serialize) -> Result<(), LogStoreError> {
        let entry = LogEntry {
            timestamp: crate::utils::timestamp(),
            session_id: self.session_id.clone(),
            log_type: kind,
            data: serde_json::to_value(data)?,
        };
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let _guard = self.file.lock.lock().map_err(|_| LogStoreError::Poisoned)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file.path)
            .map_err(|source| self.io_error(source))?;
        file.write_all(line.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|source| self.io_error(source))?;
        Ok(())
    }

    /// Every well-formed entry, in file (append) order.
    pub fn read_all(&self) -> Result<Vec<LogEntry>, LogStoreError> {
        let file = match File::open(&self.file.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(self.io_error(source)),
        };

        let mut entries = Vec::new();
        for (n, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| self.io_error(source))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<LogEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(
                    "Ignoring malformed log line {} in {}: {}",
                    n + 1,
                    self.file.path.display(),
                    e
                ),
            }
        }
        Ok(entries)
    }

    /// Matching entries, newest first, truncated to `query.limit`.
    pub fn query(&self, query: &LogQuery) -> Result<Vec<LogEntry>, LogStoreError> {
        let mut entries: Vec<LogEntry> = self
            .read_all()?
            .into_iter()
            .rev()
            .filter(|e| query.matches(e))
            .collect();
        // Stable: ties keep reverse append order; unparsable timestamps sort last.
        entries.sort_by_key(|e| Reverse(e.parsed_timestamp()));
        if let Some(limit) = query.limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    pub fn analytics(&self) -> Result<LogAnalytics, LogStoreError> {
        Ok(LogAnalytics::from_entries(&self.read_all()?))
    }

    /// Truncate the store. Does nothing unless `confirm` is set.
    pub fn clear(&self, confirm: bool) -> Result<bool, LogStoreError> {
        if !confirm {
            return Ok(false);
        }
        let _guard = self.file.lock.lock().map_err(|_| LogStoreError::Poisoned)?;
        File::create(&self.file.path).map_err(|source| self.io_error(source))?;
        debug!(path = %self.file.path.display(), "Cleared log store");
        Ok(true)
    }

    fn io_error(&self, source: std::io::Error) -> LogStoreError {
        LogStoreError::Io {
            path: self.file.path.clone(),
            source,
        }
    }
}

impl std::fmt::Debug for LogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogStore")
            .field("path", &self.file.path)
            .field("session_id", &self.session_id)
            .finish()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
