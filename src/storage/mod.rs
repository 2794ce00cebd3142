//! Durable key-value storage for client state.
//!
//! The credential store persists three string keys (token, user JSON,
//! expiry). The backend trait mirrors that shape directly so the
//! adapter above it stays oblivious to where the bytes live:
//! - [`FileStorage`] writes one file per key under a directory and is
//!   the production backend.
//! - [`MemoryStorage`] keeps a map behind a mutex; sharing one instance
//!   between two stores models two browser tabs over the same storage.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;

/// String key-value store the credential adapter persists through.
pub trait StorageBackend: Send + Sync {
    /// Read a key. `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Write a key, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Shared handle to a storage backend.
pub type SharedStorage = Arc<dyn StorageBackend>;

// ── File-backed storage ──────────────────────────────────────────

/// One-file-per-key storage under a directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (or create) the storage directory.
    pub fn new(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.key_path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ── In-memory storage ────────────────────────────────────────────

/// Map-backed storage for tests and cross-tab simulation.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────
