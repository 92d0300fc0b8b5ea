//! Record store trait and implementations
//!
//! A record store holds one opaque record per key. The cache reads its record
//! exactly once at construction and writes it back in full; how the record is
//! serialized and where it lives is entirely the store's concern.

use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Trait for backing stores holding one record per key
///
/// This allows swapping the JSON file store for a database table, a host
/// application's own storage, or an in-memory map in tests.
pub trait RecordStore: Send + Sync {
    /// Load the record stored under `key`, or `None` if absent
    fn load(&self, key: &str) -> Result<Option<Value>>;

    /// Persist `record` under `key`, replacing any prior content
    ///
    /// A successful return guarantees that a subsequent `load` (including one
    /// from a fresh process, for persistent stores) observes an equal value.
    fn store(&self, key: &str, record: &Value) -> Result<()>;
}

// =============================================================================
// JSON File Store
// =============================================================================

/// File-backed record store, one JSON document per key (default)
#[derive(Clone)]
pub struct JsonFileStore {
    /// Directory holding the record files
    dir: PathBuf,
    /// Pretty print JSON output
    pretty: bool,
}

impl JsonFileStore {
    /// Create a store writing pretty-printed JSON into `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            pretty: true,
        }
    }

    /// Create a compact store (no pretty printing)
    pub fn compact(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            pretty: false,
        }
    }

    /// Create a store rooted at the system config directory for `app_name`
    ///
    /// Falls back to the current directory when the platform config directory
    /// cannot be determined.
    pub fn for_app(app_name: &str) -> Self {
        let dir = dirs::config_dir()
            .map(|d| d.join(app_name))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(dir)
    }

    /// Directory holding the record files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn serialize(&self, record: &Value) -> Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(record).map_err(Error::from)
        } else {
            serde_json::to_string(record).map_err(Error::from)
        }
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        let path = self.record_path(key);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::FileRead { path, source: e }),
        };
        serde_json::from_str(&content).map(Some).map_err(Error::from)
    }

    fn store(&self, key: &str, record: &Value) -> Result<()> {
        let path = self.record_path(key);
        let content = self.serialize(record)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        // Atomic write: temp file + rename
        // Use .tmp suffix append to preserve original filename fully
        let file_name = path.file_name().ok_or_else(|| {
            Error::Config(format!(
                "Invalid record path '{}': must have a filename",
                path.display()
            ))
        })?;
        let mut temp_filename = file_name.to_os_string();
        temp_filename.push(".tmp");
        let temp_path = path.with_file_name(temp_filename);

        std::fs::write(&temp_path, &content).map_err(|e| Error::FileWrite {
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &path).map_err(|e| Error::FileWrite { path, source: e })
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-memory record store (not persisted)
///
/// Cloning shares the underlying records, so several caches or a test harness
/// can observe the same slots.
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryStore {
    /// Create a new empty memory store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the record currently stored under `key`
    #[must_use]
    pub fn snapshot(&self, key: &str) -> Option<Value> {
        self.records.read().ok().and_then(|r| r.get(key).cloned())
    }
}

impl RecordStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.records.read().ok().and_then(|r| r.get(key).cloned()))
    }

    fn store(&self, key: &str, record: &Value) -> Result<()> {
        if let Ok(mut records) = self.records.write() {
            records.insert(key.to_string(), record.clone());
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
