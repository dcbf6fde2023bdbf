//! Command dispatch: token → operation → one mutation of the head store.

pub mod builtins;
pub mod context;
pub mod invocation;
pub mod registry;

pub use context::OpContext;
pub use invocation::{Invocation, Requires, DEFAULT_COMMAND};
pub use registry::{Operation, Outcome, Registry};

use crate::context::ActivePointer;
use crate::env::{Environment, Streams};
use crate::error::CtxError;
use tracing::{debug, warn};

/// Runs one invocation against the registry.
pub struct Dispatcher {
    registry: Registry,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Dispatcher with the built-in operation table.
    pub fn new() -> Self {
        Self::with_registry(Registry::with_builtins())
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self { registry }
    }

    /// Add an extension operation; it is consulted after everything registered before it.
    pub fn register(&mut self, op: Box<dyn Operation>) {
        self.registry.register(op);
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// One dispatch cycle: resolve the operation, check its arguments, run it,
    /// then persist the head store and its log if it mutated anything.
    pub fn dispatch<'a, S: AsRef<str>>(
        &'a self,
        env: &'a Environment,
        args: &[S],
        streams: Streams<'a>,
    ) -> Result<Outcome, CtxError> {
        let inv = Invocation::parse(args);
        debug!(command = %inv.command, key = ?inv.key, value = ?inv.value, "Dispatching");

        let op = self.registry.find(&inv.command).ok_or_else(|| {
            warn!(command = %inv.command, "Unknown command");
            CtxError::UnknownCommand(inv.command.clone())
        })?;
        op.requires().check(&inv)?;

        let dir = &env.store_dir;
        dir.ensure()?;
        let _lock = if op.mutates() { Some(dir.lock()?) } else { None };

        let selection =
            ActivePointer::select(dir, env.name_override.as_deref(), &env.default_context)?;
        debug!(context = %selection.name, source = ?selection.source, "Selected context");

        let mut cx = OpContext::new(env, selection, &self.registry, streams);
        let outcome = op.execute(&mut cx, &inv)?;
        cx.finish()?;
        Ok(outcome)
    }
}
