//! Durable blob storage backends.
//!
//! The record store treats persistence as an opaque key-value medium: a blob
//! is read once at startup and rewritten in full on every mutation. There are
//! no transactions and no locking beyond what each backend needs internally.

use crate::error::StoreError;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Blob holding the active report list.
pub const REPORTS_BLOB: &str = "reports";
/// Blob holding the archived report list.
pub const ARCHIVE_BLOB: &str = "archiveReports";
/// Blob holding the activity log.
pub const LOGS_BLOB: &str = "logs";

/// Opaque get/set of named blobs.
pub trait DurableStore: Send + Sync {
    /// Returns the bytes stored under `key`, or `None` if nothing was stored.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replaces the bytes stored under `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

/// Loads a JSON list blob, treating a missing blob as empty.
pub fn load_list<T, S>(store: &S, key: &str) -> Result<Vec<T>, StoreError>
where
    T: DeserializeOwned,
    S: DurableStore + ?Sized,
{
    match store.get(key)? {
        None => Ok(Vec::new()),
        Some(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            blob: key.to_string(),
            source,
        }),
    }
}

/// Rewrites a JSON list blob in full.
pub fn store_list<T, S>(store: &S, key: &str, items: &[T]) -> Result<(), StoreError>
where
    T: Serialize,
    S: DurableStore + ?Sized,
{
    let bytes = serde_json::to_vec(items)?;
    tracing::debug!(blob = key, bytes = bytes.len(), "persisting blob");
    store.set(key, &bytes)
}

/// Directory-backed store: one `<key>.json` file per blob.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// blob, so readers never observe a partially written blob.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Returns the directory holding the blobs.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl DurableStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.blob_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let path = self.blob_path(key)?;
        let tmp = self.root.join(format!(".{}.json.tmp", key));
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-memory store that counts writes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    writes: Mutex<usize>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls performed so far.
    pub fn writes(&self) -> usize {
        *self.writes.lock()
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.blobs.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.blobs.lock().insert(key.to_string(), value.to_vec());
        *self.writes.lock() += 1;
        Ok(())
    }
}
