//! ctx CLI Binary
//!
//! Command-line entry point for the shellctx context store.

use anyhow::Context;
use clap::Parser;
use shellctx::cli::{Cli, RunContext, EXIT_FAILURE};
use shellctx::config::{ConfigLoader, CtxConfig};
use shellctx::env::Streams;
use shellctx::logging::{init_logging, level_for_verbosity, resolve_log_file_path, LoggingConfig};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::Path;
use std::process;
use tracing::info;

fn main() {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(EXIT_FAILURE);
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    let vars = env_snapshot(std::env::vars_os());
    let config = load_config(cli, &vars).context("failed to load configuration")?;

    let store_hint = cli.home.clone().or_else(|| config.home.clone());
    let logging_config = build_logging_config(cli, &config, store_hint.as_deref());
    init_logging(Some(&logging_config)).context("failed to initialize logging")?;
    info!(args = ?cli.args, "ctx starting");

    let argv: Vec<String> = std::env::args_os()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    let cwd = std::env::current_dir().context("cannot read the working directory")?;
    let context = RunContext::new(cli, &config, vars, argv, cwd)?;

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let stdin = std::io::stdin();
    let (mut out, mut err, mut input) = (stdout.lock(), stderr.lock(), stdin.lock());
    Ok(context.execute(&cli.args, Streams::new(&mut out, &mut err, &mut input)))
}

/// Process environment as UTF-8 pairs; entries that are not valid UTF-8 are skipped.
fn env_snapshot(vars: impl IntoIterator<Item = (OsString, OsString)>) -> HashMap<String, String> {
    vars.into_iter()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

fn load_config(cli: &Cli, vars: &HashMap<String, String>) -> Result<CtxConfig, shellctx::error::CtxError> {
    match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path, vars),
        None => ConfigLoader::load(vars),
    }
}

/// Build logging configuration from CLI args, environment, and config file.
/// Precedence: CLI flags override `CTX_VERBOSE` override config file override defaults.
fn build_logging_config(cli: &Cli, config: &CtxConfig, store_dir: Option<&Path>) -> LoggingConfig {
    let mut logging = config.logging.clone();

    let verbosity = if cli.verbose > 0 { cli.verbose } else { config.verbose };
    if let Some(level) = level_for_verbosity(verbosity) {
        logging.enabled = true;
        logging.level = level.to_string();
    }
    if cli.wants_logging() {
        logging.enabled = true;
    }
    if let Some(ref level) = cli.log_level {
        logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        logging.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        logging.output = output.clone();
    } else if cli.log_file.is_some() {
        logging.output = "file".to_string();
    }
    if cli.no_color {
        logging.color = false;
    }

    if logging.output == "file" {
        let fallback = store_dir
            .map(Path::to_path_buf)
            .or_else(|| config.store_dir().ok())
            .unwrap_or_default();
        logging.file = Some(resolve_log_file_path(
            cli.log_file.clone(),
            logging.file.clone(),
            &fallback,
        ));
    }

    logging
}
