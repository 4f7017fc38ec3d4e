//! Storage port for the history slot and its backends.
//!
//! The history store persists a single serialized value under a named key.
//! [`KeyValueStorage`] abstracts where that value lives so the store can run
//! against an in-memory map in tests, a directory of JSON files on a
//! workstation, or an embedded sled database.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Local persistence failures. Always recovered by the history store.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The durable copy could not be read.
    #[error("Failed to read '{key}': {reason}")]
    Read { key: String, reason: String },

    /// The durable copy could not be written.
    #[error("Failed to write '{key}': {reason}")]
    Write { key: String, reason: String },

    /// The stored value is not a valid record list.
    #[error("Failed to decode stored history: {0}")]
    Decode(#[source] serde_json::Error),

    /// The record list could not be serialized.
    #[error("Failed to encode history: {0}")]
    Encode(#[source] serde_json::Error),

    /// The key cannot be mapped onto this backend.
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
}

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

/// A string-valued key/value slot store.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, `None` if never written.
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replace the value stored under `key`.
    fn save(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// Process-local storage. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        Ok(slots.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStorage
// ---------------------------------------------------------------------------

/// One `<key>.json` file per key inside a directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` as the storage root. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !valid {
            return Err(PersistenceError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::Read {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        let write_err = |e: std::io::Error| PersistenceError::Write {
            key: key.to_string(),
            reason: e.to_string(),
        };

        std::fs::create_dir_all(&self.dir).map_err(write_err)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(write_err)?;
        std::fs::rename(&tmp, &path).map_err(write_err)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SledStorage
// ---------------------------------------------------------------------------

/// Embedded sled database; each key is a sled key holding UTF-8 bytes.
pub struct SledStorage {
    db: sled::Db,
}

impl SledStorage {
    /// Open or create a sled database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let db = sled::open(path.as_ref()).map_err(|e| PersistenceError::Read {
            key: path.as_ref().display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { db })
    }
}

impl KeyValueStorage for SledStorage {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let read_err = |reason: String| PersistenceError::Read {
            key: key.to_string(),
            reason,
        };

        let Some(bytes) = self.db.get(key).map_err(|e| read_err(e.to_string()))? else {
            return Ok(None);
        };
        let value = String::from_utf8(bytes.to_vec()).map_err(|e| read_err(e.to_string()))?;
        Ok(Some(value))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let write_err = |e: sled::Error| PersistenceError::Write {
            key: key.to_string(),
            reason: e.to_string(),
        };

        self.db.insert(key, value.as_bytes()).map_err(write_err)?;
        self.db.flush().map_err(write_err)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn encode_and_decode_errors_are_distinct() {
        let pairs: std::collections::BTreeMap<(u8, u8), u8> = [((1, 2), 3)].into();
        let encode = PersistenceError::Encode(serde_json::to_string(&pairs).unwrap_err());
        let decode = PersistenceError::Decode(serde_json::from_str::<u8>("x").unwrap_err());

        assert!(encode.to_string().starts_with("Failed to encode history"));
        assert!(decode.to_string().starts_with("Failed to decode stored history"));
    }

    #[test]
    fn memory_missing_key_is_none() {
        let storage = MemoryStorage::new();
        assert!(storage.load("missing").unwrap().is_none());
    }

    #[test]
    fn memory_save_replaces_value() {
        let storage = MemoryStorage::new();
        storage.save("slot", "one").unwrap();
        storage.save("slot", "two").unwrap();
        assert_eq!(storage.load("slot").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn file_storage_creates_dir_and_persists() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(tmp.path().join("nested"));

        assert!(storage.load("promptcraft.history").unwrap().is_none());
        storage.save("promptcraft.history", "[]").unwrap();

        let reopened = FileStorage::new(tmp.path().join("nested"));
        assert_eq!(
            reopened.load("promptcraft.history").unwrap().as_deref(),
            Some("[]")
        );
        assert!(!tmp.path().join("nested/promptcraft.history.json.tmp").exists());
    }

    #[test]
    fn file_storage_rejects_path_like_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(tmp.path());
        assert_matches!(
            storage.save("../escape", "x"),
            Err(PersistenceError::InvalidKey(_))
        );
        assert_matches!(storage.load(""), Err(PersistenceError::InvalidKey(_)));
    }

    #[test]
    fn file_storage_write_into_file_path_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "not a dir").unwrap();

        let storage = FileStorage::new(&blocker);
        assert_matches!(storage.save("slot", "x"), Err(PersistenceError::Write { .. }));
    }

    #[test]
    fn sled_storage_save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = SledStorage::open(tmp.path().join("db")).unwrap();

        assert!(storage.load("slot").unwrap().is_none());
        storage.save("slot", "[1,2]").unwrap();
        storage.save("slot", "[3]").unwrap();
        assert_eq!(storage.load("slot").unwrap().as_deref(), Some("[3]"));
    }
}
