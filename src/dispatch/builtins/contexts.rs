//! Operations on whole contexts rather than entries.

use crate::audit::{AuditLog, LogRecord};
use crate::clock::Timestamper;
use crate::context::ActivePointer;
use crate::dispatch::context::OpContext;
use crate::dispatch::invocation::{Invocation, Requires};
use crate::dispatch::registry::{Operation, Outcome};
use crate::error::CtxError;
use tracing::info;

/// List contexts, or move the active context pointer.
pub struct Switch;

impl Operation for Switch {
    fn aliases(&self) -> &[&'static str] {
        &["switch"]
    }
    fn requires(&self) -> Requires {
        Requires::Nothing
    }
    /// Writes the pointer file, so it runs under the store lock.
    fn mutates(&self) -> bool {
        true
    }
    fn summary(&self) -> &'static str {
        "list contexts, or make NAME the active context"
    }
    fn usage(&self) -> &'static str {
        "[NAME]"
    }

    fn execute(&self, cx: &mut OpContext<'_>, inv: &Invocation) -> Result<Outcome, CtxError> {
        let style = cx.style;
        let active = cx.context_name().to_string();

        let Some(target) = inv.key.as_deref() else {
            let mut names = cx.store_dir().list_names()?;
            if !names.contains(&active) {
                names.push(active.clone());
                names.sort();
            }
            for name in &names {
                let line = if *name == active {
                    style.value(&format!("* {}", name))
                } else {
                    format!("  {}", name)
                };
                cx.println(&line)?;
            }
            return Ok(Outcome::ok());
        };

        let line = if cx.selection.is_override() {
            format!(
                "context set by CTX_NAME as {}. Not switching.",
                style.value(&active)
            )
        } else if target == active {
            format!("already on \"{}\"", style.value(target))
        } else {
            ActivePointer::write(cx.store_dir(), target)?;
            info!(from = %active, to = target, "Switched context");
            format!(
                "switching to \"{}\" from \"{}\"",
                style.value(target),
                style.value(&active)
            )
        };
        cx.println(&line)?;
        Ok(Outcome::ok())
    }
}

/// Remove a context's store file. Its log is kept and records the removal.
pub struct DeleteNamedContext;

impl Operation for DeleteNamedContext {
    fn aliases(&self) -> &[&'static str] {
        &["delete-named-context", "_delctx"]
    }
    fn requires(&self) -> Requires {
        Requires::Key
    }
    fn mutates(&self) -> bool {
        true
    }
    fn summary(&self) -> &'static str {
        "delete the store file of context KEY"
    }

    fn execute(&self, cx: &mut OpContext<'_>, inv: &Invocation) -> Result<Outcome, CtxError> {
        let name = inv.key()?;
        let dir = cx.store_dir();
        if !dir.remove_store(name)? {
            return Err(CtxError::ContextNotFound(name.to_string()));
        }

        let mut log = AuditLog::load(dir, name)?;
        let mut stamper = Timestamper::new(cx.env.clock.clone());
        if let Some(last) = log.last_timestamp() {
            stamper.observe(last);
        }
        log.append(vec![LogRecord::new(
            stamper.next(),
            inv.command.clone(),
            Some(name.to_string()),
            None,
        )])?;
        info!(context = name, "Deleted context store");
        Ok(Outcome::ok())
    }
}

pub struct PrintStorePath;

impl Operation for PrintStorePath {
    fn aliases(&self) -> &[&'static str] {
        &["print-store-path", "_ctxpath"]
    }
    fn requires(&self) -> Requires {
        Requires::Nothing
    }
    fn summary(&self) -> &'static str {
        "print the storage directory"
    }

    fn execute(&self, cx: &mut OpContext<'_>, _inv: &Invocation) -> Result<Outcome, CtxError> {
        let root = cx.store_dir().root().display().to_string();
        cx.println(&root)?;
        Ok(Outcome::ok())
    }
}
