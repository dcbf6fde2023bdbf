//! Active context pointer (`_name.txt`).

use crate::error::StorageError;
use crate::store::StoreDir;
use std::fs;

/// Where the active context name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSource {
    /// `CTX_NAME` or `--name`; pointer writes are suppressed.
    Override,
    Pointer,
    Default,
}

/// The context name in effect for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub name: String,
    pub source: NameSource,
}

impl Selection {
    pub fn is_override(&self) -> bool {
        self.source == NameSource::Override
    }
}

pub struct ActivePointer;

impl ActivePointer {
    /// Current pointer contents, if the file exists and is non-blank.
    pub fn read(dir: &StoreDir) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(dir.pointer_path()) {
            Ok(content) => {
                let name = content.trim();
                Ok((!name.is_empty()).then(|| name.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    pub fn write(dir: &StoreDir, name: &str) -> Result<(), StorageError> {
        dir.ensure()?;
        fs::write(dir.pointer_path(), name)?;
        Ok(())
    }

    /// Override, then pointer file, then the configured default.
    pub fn select(
        dir: &StoreDir,
        override_name: Option<&str>,
        default_name: &str,
    ) -> Result<Selection, StorageError> {
        if let Some(name) = override_name.filter(|n| !n.is_empty()) {
            return Ok(Selection {
                name: name.to_string(),
                source: NameSource::Override,
            });
        }
        Ok(match Self::read(dir)? {
            Some(name) => Selection {
                name,
                source: NameSource::Pointer,
            },
            None => Selection {
                name: default_name.to_string(),
                source: NameSource::Default,
            },
        })
    }
}
