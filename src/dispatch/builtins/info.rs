//! Help, version, and argument diagnostics. None of these touch the store.

use crate::dispatch::context::OpContext;
use crate::dispatch::invocation::{Invocation, Requires};
use crate::dispatch::registry::{Operation, Outcome, Registry};
use crate::error::CtxError;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;

pub struct Help;

/// Render the registry as a command table.
pub fn format_help(registry: &Registry) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Command", "Arguments", "Description"]);
    for op in registry.iter() {
        let args = [op.requires().usage(), op.usage()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        table.add_row(vec![op.aliases().join(", "), args, op.summary().to_string()]);
    }
    format!(
        "usage: ctx [OPTIONS] [COMMAND] [KEY] [VALUE...]\n\n{}\n\nWith no command, shows every entry of the active context.",
        table
    )
}

impl Operation for Help {
    fn aliases(&self) -> &[&'static str] {
        &["help", "-h", "--help"]
    }
    fn requires(&self) -> Requires {
        Requires::Nothing
    }
    fn summary(&self) -> &'static str {
        "show this table"
    }

    fn execute(&self, cx: &mut OpContext<'_>, _inv: &Invocation) -> Result<Outcome, CtxError> {
        let text = format_help(cx.registry);
        cx.println(&text)?;
        Ok(Outcome::ok())
    }
}

pub struct Version;

impl Operation for Version {
    fn aliases(&self) -> &[&'static str] {
        &["version", "-v", "--version"]
    }
    fn requires(&self) -> Requires {
        Requires::Nothing
    }
    fn summary(&self) -> &'static str {
        "print the version to stderr"
    }

    fn execute(&self, cx: &mut OpContext<'_>, _inv: &Invocation) -> Result<Outcome, CtxError> {
        cx.eprintln(&format!("shellctx version {}", env!("CARGO_PKG_VERSION")))?;
        Ok(Outcome::ok())
    }
}

/// Echo the raw process arguments to stderr, one per line.
pub struct Args;

impl Operation for Args {
    fn aliases(&self) -> &[&'static str] {
        &["args", "_print"]
    }
    fn requires(&self) -> Requires {
        Requires::Nothing
    }
    fn summary(&self) -> &'static str {
        "print each process argument to stderr"
    }

    fn execute(&self, cx: &mut OpContext<'_>, _inv: &Invocation) -> Result<Outcome, CtxError> {
        let argv = cx.env.argv.clone();
        for (i, arg) in argv.iter().enumerate() {
            cx.eprintln(&format!("  {:>3} = '{}'", i, arg))?;
        }
        Ok(Outcome::ok())
    }
}
