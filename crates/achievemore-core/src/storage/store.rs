//! Snapshot stores.
//!
//! A store holds exactly one snapshot. `load` returning `Ok(None)` means
//! nothing has been saved yet, which the engine treats as a fresh start.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::{data_dir, Config, Snapshot};
use crate::error::PersistenceError;

pub trait SnapshotStore: Send {
    /// # Errors
    /// Returns an error if the stored blob cannot be read or decoded.
    fn load(&self) -> Result<Option<Snapshot>, PersistenceError>;

    /// # Errors
    /// Returns an error if the snapshot cannot be written.
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError>;
}

/// JSON file on disk, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<data_dir>/<storage.data_file>`.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn open_default(config: &Config) -> Result<Self, PersistenceError> {
        Ok(Self::new(data_dir()?.join(&config.storage.data_file)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    fn write_failed(&self, source: io::Error) -> PersistenceError {
        PersistenceError::WriteFailed {
            path: self.path.clone(),
            source,
        }
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PersistenceError::ReadFailed {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if text.trim().is_empty() {
            return Ok(None);
        }
        Snapshot::decode(&text).map(Some)
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let text = snapshot.encode()?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.write_failed(e))?;
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, text).map_err(|e| self.write_failed(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.write_failed(e))?;
        Ok(())
    }
}

/// In-process store holding the encoded blob.
///
/// Clones share the blob, so a test can inspect what the engine saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blob: Arc<Mutex<Option<String>>>,
    read_only: Arc<Mutex<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a raw blob, as if a previous session had saved it.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        let store = Self::default();
        *store.blob.lock() = Some(blob.into());
        store
    }

    pub fn blob(&self) -> Option<String> {
        self.blob.lock().clone()
    }

    /// Make subsequent saves fail with [`PersistenceError::ReadOnly`].
    pub fn set_read_only(&self, read_only: bool) {
        *self.read_only.lock() = read_only;
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        match self.blob.lock().as_deref() {
            None => Ok(None),
            Some(text) => Snapshot::decode(text).map(Some),
        }
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        if *self.read_only.lock() {
            return Err(PersistenceError::ReadOnly);
        }
        let text = snapshot.encode()?;
        *self.blob.lock() = Some(text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_through_file() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nested").join("data.json"));
        let snap = Snapshot {
            user_name: "Grace".into(),
            streak: 3,
            ..Snapshot::default()
        };

        store.save(&snap).unwrap();
        assert!(!store.tmp_path().exists());
        assert_eq!(store.load().unwrap().unwrap(), snap);
    }

    #[test]
    fn corrupt_file_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "not json").unwrap();
        let store = JsonFileStore::new(path);
        assert!(matches!(store.load(), Err(PersistenceError::Malformed(_))));
    }

    #[test]
    fn read_only_memory_store_rejects_saves() {
        let mut store = MemoryStore::new();
        store.set_read_only(true);
        assert!(matches!(
            store.save(&Snapshot::default()),
            Err(PersistenceError::ReadOnly)
        ));
        store.set_read_only(false);
        store.save(&Snapshot::default()).unwrap();
        assert!(store.blob().is_some());
    }
}
