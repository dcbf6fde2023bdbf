//! Explicit process environment handed to every dispatch.
//!
//! Nothing in the dispatcher reads ambient process state; the binary
//! captures it once into an [`Environment`] and tests build one directly.

use crate::clock::{Clock, SystemClock};
use crate::store::StoreDir;
use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Default context used when neither an override nor a pointer exists.
pub const DEFAULT_CONTEXT: &str = "main";

/// Environment variable that overrides the active context name.
pub const ENV_NAME: &str = "CTX_NAME";
/// Environment variable that overrides the storage directory.
pub const ENV_HOME: &str = "CTX_HOME";
/// Environment variable holding the integer verbosity level.
pub const ENV_VERBOSE: &str = "CTX_VERBOSE";
/// Environment variable naming an explicit config file.
pub const ENV_CONFIG: &str = "CTX_CONFIG";

pub struct Environment {
    pub store_dir: StoreDir,
    pub name_override: Option<String>,
    pub default_context: String,
    /// Snapshot of environment variables, consulted by `import`.
    pub vars: HashMap<String, String>,
    pub cwd: PathBuf,
    pub clock: Arc<dyn Clock>,
    pub color: bool,
    /// Raw process arguments, program name first. Used by `args`.
    pub argv: Vec<String>,
}

impl Environment {
    pub fn new(store_dir: impl Into<PathBuf>) -> Self {
        Self {
            store_dir: StoreDir::new(store_dir),
            name_override: None,
            default_context: DEFAULT_CONTEXT.to_string(),
            vars: HashMap::new(),
            cwd: PathBuf::from("."),
            clock: Arc::new(SystemClock),
            color: false,
            argv: Vec::new(),
        }
    }

    pub fn with_name_override(mut self, name: Option<String>) -> Self {
        self.name_override = name;
        self
    }

    pub fn with_default_context(mut self, name: impl Into<String>) -> Self {
        self.default_context = name.into();
        self
    }

    pub fn with_vars(mut self, vars: HashMap<String, String>) -> Self {
        self.vars = vars;
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_argv(mut self, argv: Vec<String>) -> Self {
        self.argv = argv;
        self
    }
}

/// Standard streams for one dispatch.
pub struct Streams<'a> {
    pub out: &'a mut dyn Write,
    pub err: &'a mut dyn Write,
    pub input: &'a mut dyn BufRead,
}

impl<'a> Streams<'a> {
    pub fn new(out: &'a mut dyn Write, err: &'a mut dyn Write, input: &'a mut dyn BufRead) -> Self {
        Self { out, err, input }
    }
}
