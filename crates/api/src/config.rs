use std::path::PathBuf;
use std::sync::Arc;

use promptcraft_core::record::MAX_HISTORY_ITEMS;
use promptcraft_history::{
    FileStorage, KeyValueStorage, MemoryStorage, PersistenceError, SledStorage,
};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`). Must exceed the
    /// upstream model timeout so slow generations surface as upstream errors.
    pub request_timeout_secs: u64,
    /// Where and how prompt history is persisted.
    pub history: HistoryConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `120`                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            history: HistoryConfig::from_env(),
        }
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryBackend {
    File,
    Sled,
    Memory,
}

impl HistoryBackend {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "file" => Some(Self::File),
            "sled" => Some(Self::Sled),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistoryConfig {
    pub backend: HistoryBackend,
    /// Directory (file backend) or database path (sled backend).
    pub path: PathBuf,
    /// Maximum number of records kept.
    pub capacity: usize,
}

impl HistoryConfig {
    /// | Env Var            | Default          |
    /// |--------------------|------------------|
    /// | `HISTORY_BACKEND`  | `file`           |
    /// | `HISTORY_PATH`     | `./data/history` |
    /// | `HISTORY_CAPACITY` | `10`             |
    pub fn from_env() -> Self {
        let backend_name = std::env::var("HISTORY_BACKEND").unwrap_or_else(|_| "file".into());
        let backend = HistoryBackend::from_name(&backend_name).unwrap_or_else(|| {
            panic!("HISTORY_BACKEND must be one of: file, sled, memory (got '{backend_name}')")
        });

        let path = std::env::var("HISTORY_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/history"));

        let capacity: usize = std::env::var("HISTORY_CAPACITY")
            .unwrap_or_else(|_| MAX_HISTORY_ITEMS.to_string())
            .parse()
            .expect("HISTORY_CAPACITY must be a valid usize");
        assert!(capacity > 0, "HISTORY_CAPACITY must be at least 1");

        Self {
            backend,
            path,
            capacity,
        }
    }

    /// In-memory history with the default capacity.
    pub fn in_memory() -> Self {
        Self {
            backend: HistoryBackend::Memory,
            path: PathBuf::new(),
            capacity: MAX_HISTORY_ITEMS,
        }
    }

    /// Open the configured storage backend.
    pub fn open_storage(&self) -> Result<Arc<dyn KeyValueStorage>, PersistenceError> {
        Ok(match self.backend {
            HistoryBackend::File => Arc::new(FileStorage::new(&self.path)),
            HistoryBackend::Sled => Arc::new(SledStorage::open(&self.path)?),
            HistoryBackend::Memory => Arc::new(MemoryStorage::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names_parse() {
        assert_eq!(HistoryBackend::from_name("file"), Some(HistoryBackend::File));
        assert_eq!(HistoryBackend::from_name("sled"), Some(HistoryBackend::Sled));
        assert_eq!(HistoryBackend::from_name("memory"), Some(HistoryBackend::Memory));
        assert_eq!(HistoryBackend::from_name("redis"), None);
    }

    #[test]
    fn file_backend_opens_without_touching_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let config = HistoryConfig {
            backend: HistoryBackend::File,
            path: tmp.path().join("history"),
            capacity: 5,
        };
        let storage = config.open_storage().unwrap();
        assert!(storage.load("promptcraft.history").unwrap().is_none());
        assert!(!tmp.path().join("history").exists());
    }
}
