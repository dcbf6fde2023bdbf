//! Positional argument conventions shared by every operation.

use crate::error::CtxError;

/// Command token used when no arguments are given.
pub const DEFAULT_COMMAND: &str = "fullitems";

/// One parsed invocation: `command [key [value...]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub key: Option<String>,
    /// Everything after the key, joined with single spaces.
    pub value: Option<String>,
    /// Everything after the key, unjoined.
    pub rest: Vec<String>,
}

impl Invocation {
    /// Parse arguments (program name already stripped).
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Self {
        let mut iter = args.iter().map(|s| s.as_ref().to_string());
        let command = iter.next().unwrap_or_else(|| DEFAULT_COMMAND.to_string());
        let key = iter.next();
        let rest: Vec<String> = iter.collect();
        let value = (!rest.is_empty()).then(|| rest.join(" "));
        Self {
            command,
            key,
            value,
            rest,
        }
    }

    pub fn key(&self) -> Result<&str, CtxError> {
        self.key.as_deref().ok_or_else(|| CtxError::MissingArgument {
            command: self.command.clone(),
            what: "a key",
        })
    }

    pub fn value(&self) -> Result<&str, CtxError> {
        self.value.as_deref().ok_or_else(|| CtxError::MissingArgument {
            command: self.command.clone(),
            what: "a value",
        })
    }

    /// The value as exactly one word, e.g. the target of `rename`.
    pub fn single_word_value(&self) -> Result<&str, CtxError> {
        let value = self.value()?;
        if self.rest.len() != 1 || value.split_whitespace().count() != 1 {
            return Err(CtxError::InvalidArgument {
                command: self.command.clone(),
                reason: format!("expected a single word, got \"{}\"", value),
            });
        }
        Ok(value)
    }

    /// The key followed by every whitespace-separated word of the value.
    pub fn key_list(&self) -> Vec<&str> {
        self.key
            .as_deref()
            .into_iter()
            .chain(self.value.as_deref().into_iter().flat_map(str::split_whitespace))
            .collect()
    }
}

/// Argument shape an operation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requires {
    Nothing,
    Key,
    /// A value after the key; the key itself may be anything.
    Value,
    KeyAndValue,
}

impl Requires {
    pub fn check(self, inv: &Invocation) -> Result<(), CtxError> {
        match self {
            Requires::Nothing => Ok(()),
            Requires::Key => inv.key().map(|_| ()),
            Requires::Value => inv.value().map(|_| ()),
            Requires::KeyAndValue => {
                inv.key()?;
                inv.value().map(|_| ())
            }
        }
    }

    /// Usage fragment for help output.
    pub fn usage(self) -> &'static str {
        match self {
            Requires::Nothing => "",
            Requires::Key => "KEY",
            Requires::Value => "_ VALUE",
            Requires::KeyAndValue => "KEY VALUE",
        }
    }
}
