//! Config facade: the single entry point that assembles and validates configuration.

use super::merge::{apply_env_overrides, builder_with_defaults};
use super::sources::global_file;
use super::CtxConfig;
use crate::env::ENV_CONFIG;
use crate::error::CtxError;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Loads [`CtxConfig`] from defaults, files, and environment overrides.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load using the global file, or the file named by `CTX_CONFIG` if set.
    pub fn load(vars: &HashMap<String, String>) -> Result<CtxConfig, CtxError> {
        if let Some(path) = vars.get(ENV_CONFIG).filter(|v| !v.is_empty()) {
            return Self::load_from_file(Path::new(path), vars);
        }
        let builder = global_file::add_to_builder(builder_with_defaults()?, vars)?;
        Self::finish(apply_env_overrides(builder, vars)?)
    }

    /// Load from one explicit file instead of the global one.
    pub fn load_from_file(path: &Path, vars: &HashMap<String, String>) -> Result<CtxConfig, CtxError> {
        debug!(config_path = %path.display(), "Loading configuration file");
        let builder = global_file::add_explicit(builder_with_defaults()?, path)?;
        Self::finish(apply_env_overrides(builder, vars)?)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<CtxConfig, CtxError> {
        let config: CtxConfig = builder.build()?.try_deserialize()?;
        config.validate().map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            CtxError::Config(format!(
                "Configuration validation failed:\n{}",
                msgs.join("\n")
            ))
        })?;
        Ok(config)
    }
}
