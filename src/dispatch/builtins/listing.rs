//! Read-only listings of the layered view and its log.

use crate::clock::format_timestamp;
use crate::dispatch::context::OpContext;
use crate::dispatch::invocation::{Invocation, Requires};
use crate::dispatch::registry::{Operation, Outcome};
use crate::error::{CtxError, StorageError};

/// Header plus every entry, newest first. The default command.
pub struct FullItems;

impl Operation for FullItems {
    fn aliases(&self) -> &[&'static str] {
        &["fullitems", "_fullitems"]
    }
    fn requires(&self) -> Requires {
        Requires::Nothing
    }
    fn summary(&self) -> &'static str {
        "show the context name and all entries, newest first"
    }

    fn execute(&self, cx: &mut OpContext<'_>, _inv: &Invocation) -> Result<Outcome, CtxError> {
        let style = cx.style;
        let view = cx.view()?;
        let name = view.name().to_string();
        let count = view.len();
        let lines: Vec<String> = view
            .by_recency()
            .into_iter()
            .map(|(key, entry)| {
                format!(
                    "{}    {} = {}",
                    style.stamp(&entry.timestamp),
                    style.key(key),
                    style.value(&entry.value)
                )
            })
            .collect();

        let mut header = format!("Using context {}", style.value(&name));
        if cx.selection.is_override() {
            header.push_str(" set by CTX_NAME");
        }
        cx.println(&header)?;
        cx.println(&format!("There are {} entries.\n", style.value(&count.to_string())))?;
        for line in &lines {
            cx.println(line)?;
        }
        Ok(Outcome::ok())
    }
}

pub struct Keys;

impl Operation for Keys {
    fn aliases(&self) -> &[&'static str] {
        &["keys"]
    }
    fn requires(&self) -> Requires {
        Requires::Nothing
    }
    fn summary(&self) -> &'static str {
        "list keys in order"
    }

    fn execute(&self, cx: &mut OpContext<'_>, _inv: &Invocation) -> Result<Outcome, CtxError> {
        let style = cx.style;
        let keys: Vec<String> = cx.view()?.keys().into_iter().map(|k| style.key(k)).collect();
        for key in &keys {
            cx.println(key)?;
        }
        Ok(Outcome::ok())
    }
}

/// `key=value` lines, optionally limited to the keys given.
pub struct Items;

impl Operation for Items {
    fn aliases(&self) -> &[&'static str] {
        &["items"]
    }
    fn requires(&self) -> Requires {
        Requires::Nothing
    }
    fn summary(&self) -> &'static str {
        "list key=value pairs, optionally only the KEYs given"
    }
    fn usage(&self) -> &'static str {
        "[KEY...]"
    }

    fn execute(&self, cx: &mut OpContext<'_>, inv: &Invocation) -> Result<Outcome, CtxError> {
        let style = cx.style;
        let filter = inv.key_list();
        let view = cx.view()?;
        let lines: Vec<String> = if filter.is_empty() {
            view.items()
                .into_iter()
                .map(|(k, e)| style.pair(k, &e.value))
                .collect()
        } else {
            let mut wanted = filter;
            wanted.sort_unstable();
            wanted.dedup();
            wanted
                .into_iter()
                .map(|k| view.get(k).map(|e| style.pair(k, &e.value)))
                .collect::<Result<_, _>>()?
        };
        for line in &lines {
            cx.println(line)?;
        }
        Ok(Outcome::ok())
    }
}

/// The head store's audit log, one JSON array per record.
pub struct Log;

impl Operation for Log {
    fn aliases(&self) -> &[&'static str] {
        &["log"]
    }
    fn requires(&self) -> Requires {
        Requires::Nothing
    }
    fn summary(&self) -> &'static str {
        "print the audit log of the head context"
    }

    fn execute(&self, cx: &mut OpContext<'_>, _inv: &Invocation) -> Result<Outcome, CtxError> {
        let head = cx.view()?.head().name().to_string();
        let path = cx.store_dir().log_path(&head);
        let lines = cx
            .audit_log()?
            .records()
            .iter()
            .map(|r| {
                serde_json::to_string(r).map_err(|e| StorageError::Serialize {
                    path: path.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        for line in &lines {
            cx.println(line)?;
        }
        Ok(Outcome::ok())
    }
}

pub struct Name;

impl Operation for Name {
    fn aliases(&self) -> &[&'static str] {
        &["name"]
    }
    fn requires(&self) -> Requires {
        Requires::Nothing
    }
    fn summary(&self) -> &'static str {
        "print the active context name"
    }

    fn execute(&self, cx: &mut OpContext<'_>, _inv: &Invocation) -> Result<Outcome, CtxError> {
        let name = cx.context_name().to_string();
        cx.println(&name)?;
        Ok(Outcome::ok())
    }
}

/// Current time in a form usable inside file names.
pub struct Now;

impl Operation for Now {
    fn aliases(&self) -> &[&'static str] {
        &["now"]
    }
    fn requires(&self) -> Requires {
        Requires::Nothing
    }
    fn summary(&self) -> &'static str {
        "print the current timestamp without colons"
    }

    fn execute(&self, cx: &mut OpContext<'_>, _inv: &Invocation) -> Result<Outcome, CtxError> {
        let stamp = format_timestamp(&cx.now()).replace(':', "");
        cx.println(&stamp)?;
        Ok(Outcome::ok())
    }
}
