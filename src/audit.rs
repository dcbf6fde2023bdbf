//! Audit log: one append-only record per mutation, stored beside each context.

use crate::error::StorageError;
use crate::store::persistence::{read_json_or_default, write_json_atomic};
use crate::store::StoreDir;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

type LogRecordRepr = (String, String, Option<String>, Option<String>);

/// `[timestamp, command, key, value]` as invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LogRecordRepr", into = "LogRecordRepr")]
pub struct LogRecord {
    pub timestamp: String,
    pub command: String,
    pub key: Option<String>,
    pub value: Option<String>,
}

impl LogRecord {
    pub fn new(
        timestamp: impl Into<String>,
        command: impl Into<String>,
        key: Option<String>,
        value: Option<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            command: command.into(),
            key,
            value,
        }
    }
}

impl From<LogRecordRepr> for LogRecord {
    fn from((timestamp, command, key, value): LogRecordRepr) -> Self {
        LogRecord {
            timestamp,
            command,
            key,
            value,
        }
    }
}

impl From<LogRecord> for LogRecordRepr {
    fn from(record: LogRecord) -> Self {
        (record.timestamp, record.command, record.key, record.value)
    }
}

/// The log of one context store.
#[derive(Debug)]
pub struct AuditLog {
    path: PathBuf,
    records: Vec<LogRecord>,
}

impl AuditLog {
    /// Load the log for `name`; a missing file is an empty log.
    pub fn load(dir: &StoreDir, name: &str) -> Result<Self, StorageError> {
        let path = dir.log_path(name);
        let records: Vec<LogRecord> = read_json_or_default(&path)?;
        Ok(Self { path, records })
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn last_timestamp(&self) -> Option<&str> {
        self.records.last().map(|r| r.timestamp.as_str())
    }

    /// Append records and rewrite the file. Existing records are never touched.
    pub fn append(&mut self, records: Vec<LogRecord>) -> Result<(), StorageError> {
        if records.is_empty() {
            return Ok(());
        }
        let added = records.len();
        self.records.extend(records);
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_json_atomic(&self.path, &self.records)?;
        debug!(log = %self.path.display(), added, total = self.records.len(), "Appended audit records");
        Ok(())
    }
}
