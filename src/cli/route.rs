//! CLI route: build the dispatch environment from flags, config, and the
//! process, then run one command and turn the result into an exit status.

use crate::cli::output::{exit_code, map_error};
use crate::cli::parse::Cli;
use crate::config::CtxConfig;
use crate::dispatch::Dispatcher;
use crate::env::{Environment, Streams, ENV_NAME};
use crate::error::CtxError;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, error};

/// Everything needed to run commands for one process.
pub struct RunContext {
    env: Environment,
    dispatcher: Dispatcher,
}

impl RunContext {
    /// Resolve the storage directory, context override, and color mode.
    ///
    /// Precedence for the directory: `--home`, then `CTX_HOME` (already folded
    /// into `config`), then the config file, then `~/.ctx`.
    pub fn new(
        cli: &Cli,
        config: &CtxConfig,
        vars: HashMap<String, String>,
        argv: Vec<String>,
        cwd: PathBuf,
    ) -> Result<Self, CtxError> {
        let store_dir = match &cli.home {
            Some(home) => home.clone(),
            None => config.store_dir()?,
        };
        let name_override = cli
            .name
            .clone()
            .or_else(|| vars.get(ENV_NAME).cloned())
            .filter(|n| !n.is_empty());
        let color = !cli.no_color && config.color.enabled();
        debug!(store = %store_dir.display(), ?name_override, color, "Run context initialized");

        let env = Environment::new(store_dir)
            .with_name_override(name_override)
            .with_default_context(config.default_context.clone())
            .with_vars(vars)
            .with_cwd(cwd)
            .with_color(color)
            .with_argv(argv);
        Ok(Self::from_environment(env))
    }

    /// Run context over a prepared environment with the built-in commands.
    pub fn from_environment(env: Environment) -> Self {
        Self {
            env,
            dispatcher: Dispatcher::new(),
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    /// Dispatch `args` and return the process exit status. Errors are
    /// reported here; unknown commands go to stdout, everything else to stderr.
    pub fn execute<S: AsRef<str>>(&self, args: &[S], streams: Streams<'_>) -> i32 {
        let Streams { out, err, input } = streams;
        match self
            .dispatcher
            .dispatch(&self.env, args, Streams::new(&mut *out, &mut *err, &mut *input))
        {
            Ok(outcome) => outcome.status,
            Err(e @ CtxError::UnknownCommand(_)) => {
                let _ = writeln!(out, "{}", map_error(&e));
                exit_code(&e)
            }
            Err(e) => {
                error!("Command failed: {}", e);
                let _ = writeln!(err, "error: {}", map_error(&e));
                exit_code(&e)
            }
        }
    }
}
