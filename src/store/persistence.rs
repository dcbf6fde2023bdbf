//! Persistence layer for context stores
//!
//! Layout of the storage directory:
//! - `<name>.json`: the store, `{ key: [timestamp, value] }`
//! - `<name>.log`: the audit log, `[[timestamp, command, key, value], ...]`
//! - `_name.txt`: the active context pointer
//! - `.lock`: advisory lock held by mutating dispatch cycles

use crate::error::StorageError;
use crate::store::{ContextStore, Entry};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const STORE_EXT: &str = "json";
const LOG_EXT: &str = "log";
const POINTER_FILE: &str = "_name.txt";
const LOCK_FILE: &str = ".lock";

/// Handle on the directory holding every named store.
#[derive(Debug, Clone)]
pub struct StoreDir {
    root: PathBuf,
}

impl StoreDir {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory if it does not exist yet.
    pub fn ensure(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).map_err(|e| {
            StorageError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to create store directory {:?}: {}", self.root, e),
            ))
        })
    }

    pub fn store_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, STORE_EXT))
    }

    pub fn log_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, LOG_EXT))
    }

    pub fn pointer_path(&self) -> PathBuf {
        self.root.join(POINTER_FILE)
    }

    pub fn store_exists(&self, name: &str) -> bool {
        self.store_path(name).is_file()
    }

    /// Load a store; an absent file yields an empty store.
    pub fn load_store(&self, name: &str) -> Result<ContextStore, StorageError> {
        let path = self.store_path(name);
        let entries: BTreeMap<String, Entry> = read_json_or_default(&path)?;
        debug!(store = name, entries = entries.len(), "Loaded context store");
        Ok(ContextStore::with_entries(name, entries))
    }

    /// Rewrite a store file in full.
    pub fn save_store(&self, store: &ContextStore) -> Result<(), StorageError> {
        self.ensure()?;
        let path = self.store_path(store.name());
        write_json_atomic(&path, store.entries())?;
        debug!(store = store.name(), entries = store.len(), "Saved context store");
        Ok(())
    }

    /// Remove a store file. Returns false when there was nothing to remove.
    pub fn remove_store(&self, name: &str) -> Result<bool, StorageError> {
        let path = self.store_path(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    /// Names of every persisted store, sorted.
    pub fn list_names(&self) -> Result<Vec<String>, StorageError> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(STORE_EXT) {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => names.push(stem.to_string()),
                None => tracing::warn!("Skipping non-UTF8 store filename: {:?}", path),
            }
        }
        names.sort();
        Ok(names)
    }

    /// Take the exclusive advisory lock for a mutating dispatch cycle.
    pub fn lock(&self) -> Result<StoreLock, StorageError> {
        self.ensure()?;
        let path = self.root.join(LOCK_FILE);
        let file = fs::OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&path)?;
        file.lock_exclusive()
            .map_err(|_| StorageError::Lock(path.clone()))?;
        debug!(lock = %path.display(), "Acquired store lock");
        Ok(StoreLock { file, path })
    }
}

/// Exclusive lock on the storage directory, released on drop.
#[derive(Debug)]
pub struct StoreLock {
    file: fs::File,
    path: PathBuf,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!("Failed to release lock {:?}: {}", self.path, e);
        }
    }
}

/// Read a JSON file, treating absence as `T::default()` and bad content as corruption.
pub(crate) fn read_json_or_default<T>(path: &Path) -> Result<T, StorageError>
where
    T: DeserializeOwned + Default,
{
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(StorageError::IoError(e)),
    };
    serde_json::from_slice(&bytes).map_err(|e| StorageError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Serialize with 4-space indentation and swap the file into place.
pub(crate) fn write_json_atomic<T>(path: &Path, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
{
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser).map_err(|e| StorageError::Serialize {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut temp_name = OsString::from(path.as_os_str());
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    fs::write(&temp_path, &buf).map_err(|e| {
        StorageError::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to write {:?}: {}", temp_path, e),
        ))
    })?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        StorageError::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to rename temp file to {:?}: {}", path, e),
        ))
    })?;

    Ok(())
}
