//! Logging System
//!
//! Structured diagnostics through `tracing`. Command output never goes through
//! here; logs default to stderr and are off unless verbosity or configuration
//! turns them on.

use crate::error::CtxError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Filter directive that replaces every other level setting.
pub const ENV_LOG: &str = "CTX_LOG";

/// Log file name used when file output is requested without a path.
pub const DEFAULT_LOG_FILE: &str = "ctx.log";

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Install a subscriber at all
    #[serde(default)]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stderr, stdout, file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path (if output is "file")
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format, terminal outputs only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Level implied by an integer verbosity: 0 off, 1 info, 2 debug, 3+ trace.
pub fn level_for_verbosity(verbosity: u8) -> Option<&'static str> {
    match verbosity {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Pick the log file: explicit flag, then config, then `ctx.log` in the store directory.
pub fn resolve_log_file_path(
    cli_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    store_dir: &Path,
) -> PathBuf {
    cli_file
        .or(config_file)
        .unwrap_or_else(|| store_dir.join(DEFAULT_LOG_FILE))
}

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. `CTX_LOG` filter directive
/// 2. CLI flags and `CTX_VERBOSE`, already folded into `config`
/// 3. Configuration file
/// 4. Defaults
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), CtxError> {
    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);
    let env_directive = std::env::var(ENV_LOG).ok().filter(|v| !v.trim().is_empty());
    if !config.enabled && env_directive.is_none() {
        return Ok(());
    }

    let filter = build_env_filter(config, env_directive.as_deref())?;
    let format = determine_format(config)?;
    let output = Output::parse(&config.output)?;

    let (writer, use_color) = match output {
        Output::Stderr => (BoxMakeWriter::new(std::io::stderr), config.color),
        Output::Stdout => (BoxMakeWriter::new(std::io::stdout), config.color),
        Output::File => {
            let path = config.file.clone().ok_or_else(|| {
                CtxError::Config("log output is 'file' but no log file was given".to_string())
            })?;
            (BoxMakeWriter::new(Mutex::new(open_log_file(&path)?)), false)
        }
    };

    let base_subscriber = Registry::default().with(filter);
    let installed = if format == "json" {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init()
    } else {
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(use_color)
                    .with_writer(writer),
            )
            .try_init()
    };
    installed.map_err(|e| CtxError::Config(format!("Failed to install logger: {}", e)))
}

fn open_log_file(path: &Path) -> Result<std::fs::File, CtxError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            CtxError::Config(format!("Failed to create log directory: {}", e))
        })?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            CtxError::Config(format!("Failed to open log file {}: {}", path.display(), e))
        })
}

/// Build the filter from a `CTX_LOG` directive if present, else the config.
fn build_env_filter(
    config: &LoggingConfig,
    env_directive: Option<&str>,
) -> Result<EnvFilter, CtxError> {
    if let Some(directive) = env_directive {
        return EnvFilter::try_new(directive)
            .map_err(|e| CtxError::Config(format!("Invalid {} directive: {}", ENV_LOG, e)));
    }

    let level = config.level.as_str();
    if level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::try_new(level)
        .map_err(|e| CtxError::Config(format!("Invalid log level '{}': {}", level, e)))?;
    for (module, module_level) in &config.modules {
        let directive = format!("{}={}", module, module_level);
        filter = filter.add_directive(
            directive
                .parse()
                .map_err(|e| CtxError::Config(format!("Invalid log directive: {}", e)))?,
        );
    }
    Ok(filter)
}

fn determine_format(config: &LoggingConfig) -> Result<&str, CtxError> {
    match config.format.as_str() {
        f @ ("json" | "text") => Ok(f),
        other => Err(CtxError::Config(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        ))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Stderr,
    Stdout,
    File,
}

impl Output {
    fn parse(output: &str) -> Result<Self, CtxError> {
        match output {
            "stderr" => Ok(Output::Stderr),
            "stdout" => Ok(Output::Stdout),
            "file" => Ok(Output::File),
            _ => Err(CtxError::Config(format!(
                "Invalid log output: {} (must be 'stderr', 'stdout', or 'file')",
                output
            ))),
        }
    }
}
