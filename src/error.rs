//! Error types for the shellctx context store and dispatcher.

use std::path::PathBuf;
use thiserror::Error;

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Store file {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Failed to serialize {path}: {reason}")]
    Serialize { path: PathBuf, reason: String },

    #[error("Lock on {0} could not be acquired")]
    Lock(PathBuf),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors surfaced at the dispatch boundary.
#[derive(Debug, Error)]
pub enum CtxError {
    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("key already exists: {0}")]
    KeyExists(String),

    #[error("command `{command}` requires {what}")]
    MissingArgument { command: String, what: &'static str },

    #[error("invalid argument for `{command}`: {reason}")]
    InvalidArgument { command: String, reason: String },

    #[error("command not recognized: {0}")]
    UnknownCommand(String),

    #[error("clear requires the context name \"{expected}\" as confirmation, got \"{got}\"")]
    ConfirmationMismatch { expected: String, got: String },

    #[error("context not found: {0}")]
    ContextNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to run `{command}`: {source}")]
    Process {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for CtxError {
    fn from(err: config::ConfigError) -> Self {
        CtxError::Config(err.to_string())
    }
}

impl CtxError {
    /// True for errors caused by a persisted file that cannot be trusted.
    pub fn is_corrupt_store(&self) -> bool {
        matches!(self, CtxError::Storage(StorageError::Corrupt { .. }))
    }
}
