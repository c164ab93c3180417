//! Key-value storage for the metadata blob.
//!
//! The blob is written by the publisher and read back by the coordinator,
//! possibly from another process. [`MetadataStore`] is the backend seam;
//! [`SplashStorage`] binds a backend to the configurable key and keeps the
//! fail-soft policy in one place: backend errors are logged and read as
//! "nothing stored".

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use splash_types::{DEFAULT_STORAGE_KEY, SplashMetadata};

use crate::error::{Error, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Backends
// ─────────────────────────────────────────────────────────────────────────────

/// A string key-value store.
pub trait MetadataStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-process store, mostly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetadataStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// A JSON object on disk mapping keys to string values.
///
/// Every read goes to disk so values written by another process are seen.
/// Writes replace the file through a temporary sibling.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(Error::Io {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|e| Error::StorageFormat {
            path: self.path.clone(),
            source: e,
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let io_err = |source| Error::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_all()?;
        f(&mut entries);
        self.write_all(&entries)
    }
}

impl MetadataStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Keyed Storage
// ─────────────────────────────────────────────────────────────────────────────

/// A backend bound to the (changeable) metadata key. Clones share the key.
#[derive(Clone)]
pub struct SplashStorage {
    store: Arc<dyn MetadataStore>,
    key: Arc<RwLock<String>>,
}

impl std::fmt::Debug for SplashStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SplashStorage")
            .field("key", &self.key())
            .finish_non_exhaustive()
    }
}

impl SplashStorage {
    pub fn new(store: Arc<dyn MetadataStore>) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: Arc<dyn MetadataStore>, key: &str) -> Self {
        let key = if key.is_empty() { DEFAULT_STORAGE_KEY } else { key };
        Self {
            store,
            key: Arc::new(RwLock::new(key.to_string())),
        }
    }

    pub fn key(&self) -> String {
        self.key.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Change the key. Empty keys are ignored.
    pub fn set_key(&self, key: &str) {
        if key.is_empty() {
            tracing::debug!("Ignoring empty storage key");
            return;
        }
        *self.key.write().unwrap_or_else(PoisonError::into_inner) = key.to_string();
    }

    /// Blocking read of the raw blob.
    pub fn get_raw(&self) -> Option<String> {
        let key = self.key();
        match self.store.get(&key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %key, "Failed to read splash metadata: {}", e);
                None
            }
        }
    }

    pub fn set_raw(&self, value: &str) {
        let key = self.key();
        if let Err(e) = self.store.set(&key, value) {
            tracing::warn!(key = %key, "Failed to save splash metadata: {}", e);
        }
    }

    pub fn remove(&self) {
        let key = self.key();
        if let Err(e) = self.store.remove(&key) {
            tracing::warn!(key = %key, "Failed to clear splash metadata: {}", e);
        }
    }

    /// Parsed record. Missing or malformed blobs read as `EMPTY`.
    pub fn get_meta(&self) -> SplashMetadata {
        self.get_raw()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_else(SplashMetadata::empty)
    }

    pub fn set_meta(&self, meta: &SplashMetadata) {
        match serde_json::to_string(meta) {
            Ok(raw) => self.set_raw(&raw),
            Err(e) => tracing::warn!("Failed to serialize splash metadata: {}", e),
        }
    }

    pub fn clear(&self) {
        self.remove();
    }

    pub async fn get_raw_async(&self) -> Result<Option<String>> {
        let storage = self.clone();
        Ok(tokio::task::spawn_blocking(move || storage.get_raw()).await?)
    }

    pub async fn set_raw_async(&self, value: String) -> Result<()> {
        let storage = self.clone();
        tokio::task::spawn_blocking(move || storage.set_raw(&value)).await?;
        Ok(())
    }

    pub async fn remove_async(&self) -> Result<()> {
        let storage = self.clone();
        tokio::task::spawn_blocking(move || storage.remove()).await?;
        Ok(())
    }
}
