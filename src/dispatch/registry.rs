//! Operation interface and the ordered registry that resolves command tokens.

use crate::dispatch::context::OpContext;
use crate::dispatch::invocation::{Invocation, Requires};
use crate::error::CtxError;

/// Result of a successful operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Process exit status; non-zero only when a subprocess says so.
    pub status: i32,
}

impl Outcome {
    pub fn ok() -> Self {
        Self { status: 0 }
    }

    pub fn exit(status: i32) -> Self {
        Self { status }
    }
}

/// A command the dispatcher can run. Built-ins and extensions share this trait.
pub trait Operation: Send + Sync {
    /// Accepted command tokens; the first is the canonical name.
    fn aliases(&self) -> &[&'static str];

    fn requires(&self) -> Requires;

    /// Whether this operation may write to the storage directory. Mutating
    /// operations run under the directory lock.
    fn mutates(&self) -> bool {
        false
    }

    /// One-line description for `help`.
    fn summary(&self) -> &'static str;

    /// Extra usage text shown after the required arguments.
    fn usage(&self) -> &'static str {
        ""
    }

    fn execute(&self, cx: &mut OpContext<'_>, inv: &Invocation) -> Result<Outcome, CtxError>;

    fn name(&self) -> &'static str {
        self.aliases().first().copied().unwrap_or("?")
    }

    fn accepts(&self, token: &str) -> bool {
        self.aliases().iter().any(|alias| *alias == token)
    }
}

/// Ordered collection of operations; the first match wins.
#[derive(Default)]
pub struct Registry {
    ops: Vec<Box<dyn Operation>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry populated with the built-in operation table.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::dispatch::builtins::register_all(&mut registry);
        registry
    }

    /// Append an operation. Earlier registrations take precedence on alias clashes.
    pub fn register(&mut self, op: Box<dyn Operation>) {
        if let Some(shadowed) = op.aliases().iter().find(|a| self.find(a).is_some()) {
            tracing::warn!(
                alias = *shadowed,
                operation = op.name(),
                "Alias already registered; earlier operation wins"
            );
        }
        self.ops.push(op);
    }

    pub fn find(&self, token: &str) -> Option<&dyn Operation> {
        self.ops.iter().find(|op| op.accepts(token)).map(|op| op.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Operation> {
        self.ops.iter().map(|op| op.as_ref())
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
