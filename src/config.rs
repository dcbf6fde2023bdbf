//! Configuration System
//!
//! Layered settings for the `ctx` binary: built-in defaults, then the user's
//! config file, then environment overrides, then command-line flags.

use crate::context::CHAIN_SEPARATOR;
use crate::env::DEFAULT_CONTEXT;
use crate::error::CtxError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Directory name under the home directory used when nothing else is set.
pub const DEFAULT_STORE_DIR: &str = ".ctx";

/// When to color command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve `auto` against whether stdout is a terminal.
    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtxConfig {
    /// Storage directory; `~/.ctx` when unset
    #[serde(default)]
    pub home: Option<PathBuf>,

    /// Context used when no pointer file exists
    #[serde(default = "default_context")]
    pub default_context: String,

    #[serde(default)]
    pub color: ColorMode,

    /// Integer verbosity from `CTX_VERBOSE`
    #[serde(default)]
    pub verbose: u8,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_context() -> String {
    DEFAULT_CONTEXT.to_string()
}

impl Default for CtxConfig {
    fn default() -> Self {
        Self {
            home: None,
            default_context: default_context(),
            color: ColorMode::default(),
            verbose: 0,
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    DefaultContext(String),
    Home(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::DefaultContext(msg) => write!(f, "default_context: {}", msg),
            ValidationError::Home(msg) => write!(f, "home: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl CtxConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.default_context.trim().is_empty() {
            errors.push(ValidationError::DefaultContext(
                "cannot be empty".to_string(),
            ));
        } else if self.default_context.contains(CHAIN_SEPARATOR) {
            errors.push(ValidationError::DefaultContext(format!(
                "\"{}\" must name a single context, not a chain",
                self.default_context
            )));
        }

        if let Some(home) = &self.home {
            if home.as_os_str().is_empty() {
                errors.push(ValidationError::Home("cannot be empty".to_string()));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Storage directory from the config, else `~/.ctx`.
    pub fn store_dir(&self) -> Result<PathBuf, CtxError> {
        if let Some(home) = &self.home {
            return Ok(home.clone());
        }
        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(DEFAULT_STORE_DIR))
            .ok_or_else(|| {
                CtxError::Config("cannot determine the home directory; set CTX_HOME".to_string())
            })
    }
}
