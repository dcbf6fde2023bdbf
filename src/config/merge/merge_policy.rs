//! Merge rules: defaults, override order, conflict handling.

use crate::env::{DEFAULT_CONTEXT, ENV_HOME, ENV_VERBOSE};
use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;
use std::collections::HashMap;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("default_context", DEFAULT_CONTEXT)?
        .set_default("color", "auto")?
        .set_default("verbose", 0_i64)
}

/// Layer `CTX_HOME` and `CTX_VERBOSE` over whatever the files said.
/// Empty values are treated as unset.
pub fn apply_env_overrides(
    mut builder: ConfigBuilder<DefaultState>,
    vars: &HashMap<String, String>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if let Some(home) = non_empty(vars, ENV_HOME) {
        builder = builder.set_override("home", home)?;
    }
    if let Some(raw) = non_empty(vars, ENV_VERBOSE) {
        let level: u8 = raw.trim().parse().map_err(|_| {
            ConfigError::Message(format!("{} must be a small integer, got \"{}\"", ENV_VERBOSE, raw))
        })?;
        builder = builder.set_override("verbose", i64::from(level))?;
    }
    Ok(builder)
}

fn non_empty<'a>(vars: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    vars.get(key).map(String::as_str).filter(|v| !v.is_empty())
}
