//! Operations that read or write individual entries.

use crate::audit::LogRecord;
use crate::dispatch::context::OpContext;
use crate::dispatch::invocation::{Invocation, Requires};
use crate::dispatch::registry::{Operation, Outcome};
use crate::error::CtxError;
use tracing::{debug, info};

pub struct Set;

impl Operation for Set {
    fn aliases(&self) -> &[&'static str] {
        &["set"]
    }
    fn requires(&self) -> Requires {
        Requires::KeyAndValue
    }
    fn mutates(&self) -> bool {
        true
    }
    fn summary(&self) -> &'static str {
        "store VALUE under KEY"
    }

    fn execute(&self, cx: &mut OpContext<'_>, inv: &Invocation) -> Result<Outcome, CtxError> {
        let (key, value) = (inv.key()?, inv.value()?);
        let ts = cx.stamp()?;
        cx.view_mut()?.set(key, value, ts);
        cx.commit(inv)?;
        Ok(Outcome::ok())
    }
}

/// Store an absolute path built from the working directory.
pub struct SetPath;

impl Operation for SetPath {
    fn aliases(&self) -> &[&'static str] {
        &["setpath"]
    }
    fn requires(&self) -> Requires {
        Requires::Key
    }
    fn mutates(&self) -> bool {
        true
    }
    fn summary(&self) -> &'static str {
        "store the working directory joined with PATH"
    }
    fn usage(&self) -> &'static str {
        "[PATH]"
    }

    fn execute(&self, cx: &mut OpContext<'_>, inv: &Invocation) -> Result<Outcome, CtxError> {
        let key = inv.key()?;
        let base = &cx.env.cwd;
        let path = match inv.value.as_deref() {
            None | Some(".") => base.clone(),
            Some(rel) => base.join(rel),
        };
        let path = path.to_string_lossy().to_string();

        let ts = cx.stamp()?;
        cx.view_mut()?.set(key, path.clone(), ts);
        cx.commit(inv)?;

        let line = format!("setting {} = {}", cx.style.key(key), cx.style.value(&path));
        cx.println(&line)?;
        Ok(Outcome::ok())
    }
}

pub struct Get;

impl Operation for Get {
    fn aliases(&self) -> &[&'static str] {
        &["get"]
    }
    fn requires(&self) -> Requires {
        Requires::Key
    }
    fn summary(&self) -> &'static str {
        "print the value stored under KEY"
    }

    fn execute(&self, cx: &mut OpContext<'_>, inv: &Invocation) -> Result<Outcome, CtxError> {
        let value = cx.view()?.get(inv.key()?)?.value.clone();
        cx.println(&value)?;
        Ok(Outcome::ok())
    }
}

/// Print a value and remove it from the head store.
pub struct Pop;

impl Operation for Pop {
    fn aliases(&self) -> &[&'static str] {
        &["pop", "_pop"]
    }
    fn requires(&self) -> Requires {
        Requires::Key
    }
    fn mutates(&self) -> bool {
        true
    }
    fn summary(&self) -> &'static str {
        "print KEY and delete it"
    }

    fn execute(&self, cx: &mut OpContext<'_>, inv: &Invocation) -> Result<Outcome, CtxError> {
        let entry = cx.view_mut()?.delete(inv.key()?)?;
        cx.commit(inv)?;
        cx.println(&entry.value)?;
        Ok(Outcome::ok())
    }
}

pub struct Del;

impl Operation for Del {
    fn aliases(&self) -> &[&'static str] {
        &["del", "delete"]
    }
    fn requires(&self) -> Requires {
        Requires::Key
    }
    fn mutates(&self) -> bool {
        true
    }
    fn summary(&self) -> &'static str {
        "delete one or more keys from the head context"
    }
    fn usage(&self) -> &'static str {
        "[KEY...]"
    }

    fn execute(&self, cx: &mut OpContext<'_>, inv: &Invocation) -> Result<Outcome, CtxError> {
        let mut keys = inv.key_list();
        keys.dedup();
        let view = cx.view_mut()?;
        if let Some(missing) = keys.iter().find(|k| !view.head().contains(k)) {
            return Err(CtxError::KeyNotFound(missing.to_string()));
        }
        for key in &keys {
            // a repeated key may already be gone
            if view.head().contains(key) {
                view.delete(key)?;
            }
        }
        cx.commit(inv)?;
        Ok(Outcome::ok())
    }
}

pub struct Rename;

impl Operation for Rename {
    fn aliases(&self) -> &[&'static str] {
        &["rename", "mv"]
    }
    fn requires(&self) -> Requires {
        Requires::KeyAndValue
    }
    fn mutates(&self) -> bool {
        true
    }
    fn summary(&self) -> &'static str {
        "move KEY to NEW, keeping its timestamp"
    }
    fn usage(&self) -> &'static str {
        "(VALUE is NEW)"
    }

    fn execute(&self, cx: &mut OpContext<'_>, inv: &Invocation) -> Result<Outcome, CtxError> {
        let (old, new) = (inv.key()?, inv.single_word_value()?);
        cx.view_mut()?.rename(old, new)?;
        cx.commit(inv)?;
        Ok(Outcome::ok())
    }
}

pub struct CopyKey;

impl Operation for CopyKey {
    fn aliases(&self) -> &[&'static str] {
        &["copy", "cp"]
    }
    fn requires(&self) -> Requires {
        Requires::KeyAndValue
    }
    fn mutates(&self) -> bool {
        true
    }
    fn summary(&self) -> &'static str {
        "copy KEY to NEW with a fresh timestamp"
    }
    fn usage(&self) -> &'static str {
        "(VALUE is NEW)"
    }

    fn execute(&self, cx: &mut OpContext<'_>, inv: &Invocation) -> Result<Outcome, CtxError> {
        let (old, new) = (inv.key()?, inv.single_word_value()?);
        let ts = cx.stamp()?;
        cx.view_mut()?.copy(old, new, ts)?;
        cx.commit(inv)?;
        Ok(Outcome::ok())
    }
}

/// Copy an environment variable into the store.
pub struct Import;

impl Operation for Import {
    fn aliases(&self) -> &[&'static str] {
        &["import"]
    }
    fn requires(&self) -> Requires {
        Requires::Key
    }
    fn mutates(&self) -> bool {
        true
    }
    fn summary(&self) -> &'static str {
        "store environment variable VAR, optionally as ALIAS"
    }
    fn usage(&self) -> &'static str {
        "[ALIAS]"
    }

    fn execute(&self, cx: &mut OpContext<'_>, inv: &Invocation) -> Result<Outcome, CtxError> {
        let var = inv.key()?;
        let store_as = match inv.value {
            Some(_) => inv.single_word_value()?,
            None => var,
        };
        let Some(value) = cx.env.vars.get(var).cloned() else {
            debug!(var, "Environment variable not set; nothing imported");
            return Ok(Outcome::ok());
        };
        let ts = cx.stamp()?;
        cx.view_mut()?.set(store_as, value, ts);
        cx.commit(inv)?;
        Ok(Outcome::ok())
    }
}

/// Bulk-load `key=value` lines from a file or standard input.
pub struct Update;

impl Update {
    fn parse_lines(inv: &Invocation, text: &str) -> Result<Vec<(String, String)>, CtxError> {
        let mut pairs = Vec::new();
        for (n, raw) in text.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| CtxError::InvalidArgument {
                command: inv.command.clone(),
                reason: format!("line {} has no '=': {}", n + 1, line),
            })?;
            pairs.push((key.trim().to_string(), value.to_string()));
        }
        Ok(pairs)
    }
}

impl Operation for Update {
    fn aliases(&self) -> &[&'static str] {
        &["update"]
    }
    fn requires(&self) -> Requires {
        Requires::Key
    }
    fn mutates(&self) -> bool {
        true
    }
    fn summary(&self) -> &'static str {
        "load key=value lines from FILE (- for stdin)"
    }

    fn execute(&self, cx: &mut OpContext<'_>, inv: &Invocation) -> Result<Outcome, CtxError> {
        let source = inv.key()?;
        let text = if source == "-" {
            let mut buf = String::new();
            cx.input().read_to_string(&mut buf)?;
            buf
        } else {
            let path = cx.env.cwd.join(source);
            std::fs::read_to_string(&path).map_err(|e| CtxError::InvalidArgument {
                command: inv.command.clone(),
                reason: format!("cannot read {}: {}", path.display(), e),
            })?
        };

        let pairs = Self::parse_lines(inv, &text)?;
        for (key, value) in &pairs {
            let ts = cx.stamp()?;
            cx.view_mut()?.set(key, value.clone(), ts.clone());
            cx.commit_record(LogRecord::new(
                ts,
                inv.command.clone(),
                Some(key.clone()),
                Some(value.clone()),
            ));
        }
        info!(count = pairs.len(), source, "Imported entries");
        Ok(Outcome::ok())
    }
}

/// Empty the head store; the context name must be given as confirmation.
pub struct Clear;

impl Operation for Clear {
    fn aliases(&self) -> &[&'static str] {
        &["clear"]
    }
    fn requires(&self) -> Requires {
        Requires::Key
    }
    fn mutates(&self) -> bool {
        true
    }
    fn summary(&self) -> &'static str {
        "remove every entry; KEY must be the context name"
    }

    fn execute(&self, cx: &mut OpContext<'_>, inv: &Invocation) -> Result<Outcome, CtxError> {
        let confirm = inv.key()?;
        if confirm != cx.context_name() {
            return Err(CtxError::ConfirmationMismatch {
                expected: cx.context_name().to_string(),
                got: confirm.to_string(),
            });
        }
        cx.view_mut()?.clear();
        cx.commit(inv)?;
        Ok(Outcome::ok())
    }
}

/// Store VALUE under the next free `PREFIX_NNN` key.
pub struct NewEntry;

impl NewEntry {
    fn next_key<'k>(
        prefix: &str,
        keys: impl Iterator<Item = &'k str>,
    ) -> Result<String, CtxError> {
        let marker = format!("{}_", prefix);
        let max = keys
            .filter_map(|k| k.strip_prefix(marker.as_str()))
            .filter(|suffix| !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()))
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let next = max.checked_add(1).ok_or_else(|| CtxError::InvalidArgument {
            command: "entry".to_string(),
            reason: format!("no number left after {}{}", marker, max),
        })?;
        Ok(format!("{}{:03}", marker, next))
    }
}

impl Operation for NewEntry {
    fn aliases(&self) -> &[&'static str] {
        &["entry"]
    }
    fn requires(&self) -> Requires {
        Requires::KeyAndValue
    }
    fn mutates(&self) -> bool {
        true
    }
    fn summary(&self) -> &'static str {
        "store VALUE under PREFIX_NNN, the next free number"
    }

    fn execute(&self, cx: &mut OpContext<'_>, inv: &Invocation) -> Result<Outcome, CtxError> {
        let (prefix, value) = (inv.key()?, inv.value()?);
        let key = Self::next_key(prefix, cx.view()?.keys().into_iter())?;
        if cx.view()?.contains(&key) {
            return Err(CtxError::KeyExists(key));
        }
        let ts = cx.stamp()?;
        cx.view_mut()?.set(&key, value, ts);
        cx.commit(inv)?;

        let line = cx.style.pair(&key, value);
        cx.println(&line)?;
        Ok(Outcome::ok())
    }
}
