//! Global config file source: $XDG_CONFIG_HOME/shellctx/config.toml or ~/.config/shellctx/config.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path to global config file.
/// Uses XDG_CONFIG_HOME when set, then HOME, then the platform config directory.
pub fn global_config_path(vars: &HashMap<String, String>) -> Option<PathBuf> {
    let base = match vars.get("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        Some(xdg) => PathBuf::from(xdg),
        None => match vars.get("HOME").filter(|v| !v.is_empty()) {
            Some(home) => PathBuf::from(home).join(".config"),
            None => directories::BaseDirs::new()?.config_dir().to_path_buf(),
        },
    };
    Some(base.join("shellctx").join("config.toml"))
}

/// Add the global config file to the builder if it exists.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
    vars: &HashMap<String, String>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if let Some(path) = global_config_path(vars) {
        if path.exists() {
            builder = builder.add_source(file_source(&path, false));
        } else {
            debug!(config_path = %path.display(), "No global configuration file");
        }
    }
    Ok(builder)
}

/// Add an explicitly named config file; it must exist.
pub fn add_explicit(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::Message(format!(
            "config file not found: {}",
            path.display()
        )));
    }
    Ok(builder.add_source(file_source(path, true)))
}

fn file_source(path: &Path, required: bool) -> File<config::FileSourceFile, config::FileFormat> {
    File::from(path.to_path_buf())
        .format(config::FileFormat::Toml)
        .required(required)
}
