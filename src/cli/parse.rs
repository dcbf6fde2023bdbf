//! CLI parse: clap types for ctx. No behavior; definitions only.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// ctx - persistent named key-value contexts for the shell
///
/// Everything after the global options is passed to the command dispatcher
/// untouched: `ctx [OPTIONS] [COMMAND] [KEY] [VALUE...]`.
#[derive(Parser, Debug)]
#[command(name = "ctx")]
#[command(about = "Persistent named key-value contexts for the shell")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Storage directory (overrides CTX_HOME and the config file)
    #[arg(long)]
    pub home: Option<PathBuf>,

    /// Context to use for this invocation (overrides CTX_NAME)
    #[arg(long)]
    pub name: Option<String>,

    /// Configuration file path (overrides CTX_CONFIG and the global file)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Increase log verbosity (-V info, -VV debug, -VVV trace)
    #[arg(short = 'V', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stderr, stdout, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Command token followed by its key and values
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Cli {
    /// True when any flag asked for log output explicitly.
    pub fn wants_logging(&self) -> bool {
        self.verbose > 0
            || self.log_level.is_some()
            || self.log_format.is_some()
            || self.log_output.is_some()
            || self.log_file.is_some()
    }
}
