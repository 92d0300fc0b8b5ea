//! Common test utilities for optcache integration tests
//!
//! Provides a file-store fixture, raw-record readers, and store wrappers used
//! to observe write behavior.

#![allow(dead_code)]

use optcache::{Error, JsonFileStore, RecordStore, Result, SettingsCache};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// Record key used by most tests
pub const RECORD_KEY: &str = "plugin_opts";

// =============================================================================
// Test Fixture
// =============================================================================

/// Test fixture that provides a temporary directory and a file store over it
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub store: JsonFileStore,
}

impl TestFixture {
    /// Create a new fixture with an empty store directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::new(temp_dir.path());

        Self { temp_dir, store }
    }

    /// Load a cache over [`RECORD_KEY`]
    pub fn cache(&self) -> SettingsCache<JsonFileStore> {
        self.cache_for(RECORD_KEY)
    }

    /// Load a cache over an arbitrary record key
    pub fn cache_for(&self, key: &str) -> SettingsCache<JsonFileStore> {
        SettingsCache::load(self.store.clone(), key).expect("Failed to load cache")
    }

    /// Path of the file backing `key`
    pub fn record_path(&self, key: &str) -> PathBuf {
        self.temp_dir.path().join(format!("{key}.json"))
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Read the raw record JSON from disk
pub fn read_record(fixture: &TestFixture, key: &str) -> Option<Value> {
    let path = fixture.record_path(key);
    if path.exists() {
        let content = std::fs::read_to_string(&path).ok()?;
        serde_json::from_str(&content).ok()
    } else {
        None
    }
}

/// Check if an option name exists in the record file
pub fn name_in_record(fixture: &TestFixture, key: &str, name: &str) -> bool {
    read_record(fixture, key)
        .map(|json| json.get(name).is_some())
        .unwrap_or(false)
}

// =============================================================================
// Store Wrappers
// =============================================================================

/// Store wrapper counting every write that reaches the inner store
#[derive(Clone)]
pub struct CountingStore<S: RecordStore> {
    inner: S,
    writes: Arc<AtomicUsize>,
}

impl<S: RecordStore> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            writes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl<S: RecordStore> RecordStore for CountingStore<S> {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        self.inner.load(key)
    }

    fn store(&self, key: &str, record: &Value) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.store(key, record)
    }
}

/// Store whose writes always fail
#[derive(Clone, Default)]
pub struct FailingStore;

impl RecordStore for FailingStore {
    fn load(&self, _key: &str) -> Result<Option<Value>> {
        Ok(None)
    }

    fn store(&self, _key: &str, _record: &Value) -> Result<()> {
        Err(Error::Config("writes disabled".into()))
    }
}
