//! Write-back cache over a single persisted option record
//!
//! All options live in one record in the backing store, but are read and
//! written individually through the cache. Mutations only touch memory; the
//! record is flushed at most once, either through an explicit
//! [`SettingsCache::maybe_save`] or when the cache is dropped.

use crate::error::{Error, Result};
use crate::store::RecordStore;

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

/// In-memory overlay for a single persisted option record.
///
/// The cache reads its record once at construction and serves every read from
/// memory afterwards; the backing store is never re-read, even if it is
/// mutated externally. A single dirty flag tracks whether any mutation
/// occurred since the mapping last matched the persisted state, and
/// [`maybe_save`](Self::maybe_save) flushes only when it did.
///
/// Dropping a dirty cache flushes it as well, so the owner gets the
/// write-on-teardown behavior without wiring any global hook. Call
/// `maybe_save` explicitly before the cache goes out of scope to observe the
/// flush result; errors during drop can only be logged.
///
/// Several caches over the same record key are not coordinated: the last
/// writer at flush time wins.
///
/// # Example
///
/// ```
/// use optcache::{MemoryStore, SettingsCache};
/// use serde_json::json;
///
/// let mut cache = SettingsCache::load(MemoryStore::new(), "plugin_opts")?;
/// cache.set("enabled", true);
/// cache.set("greeting", "hello");
/// assert_eq!(cache.get("enabled"), Some(&json!(true)));
///
/// cache.maybe_save()?;
/// assert!(!cache.is_dirty());
/// # Ok::<(), optcache::Error>(())
/// ```
pub struct SettingsCache<S: RecordStore = crate::store::JsonFileStore> {
    /// Backing store holding the record
    store: S,

    /// Key of the record in the backing store
    record_key: String,

    /// All options, served from memory after the initial load
    settings: HashMap<String, Value>,

    /// Tracks whether a save is necessary
    dirty: bool,
}

impl<S: RecordStore> SettingsCache<S> {
    /// Load the record stored under `record_key` and build a cache over it.
    ///
    /// An absent record, or a persisted value that is not a JSON object
    /// (null, scalar, array), initializes an empty mapping; neither is an
    /// error. The cache starts clean.
    ///
    /// # Errors
    ///
    /// Returns an error if the store itself fails to load the record.
    pub fn load(store: S, record_key: impl Into<String>) -> Result<Self> {
        let record_key = record_key.into();
        let settings: HashMap<String, Value> = match store.load(&record_key)? {
            Some(Value::Object(map)) => map.into_iter().collect(),
            // Missing or non-object records start empty
            Some(_) | None => HashMap::new(),
        };

        debug!(
            "Loaded {} option(s) for record '{record_key}'",
            settings.len()
        );

        Ok(Self {
            store,
            record_key,
            settings,
            dirty: false,
        })
    }

    /// Key of the record in the backing store
    pub fn record_key(&self) -> &str {
        &self.record_key
    }

    /// Whether the mapping has been mutated since it last matched the
    /// persisted state
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Check if an option exists
    pub fn has(&self, name: &str) -> bool {
        self.settings.contains_key(name)
    }

    /// Get an option by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.settings.get(name)
    }

    /// Get an option by name, falling back to `default` when absent
    pub fn get_or<'a>(&'a self, name: &str, default: &'a Value) -> &'a Value {
        self.settings.get(name).unwrap_or(default)
    }

    /// Get and deserialize an option by name.
    ///
    /// Returns `Ok(None)` when the option is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the stored value does not deserialize
    /// into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self.settings.get(name) {
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| Error::Parse(e.to_string())),
            None => Ok(None),
        }
    }

    /// Set an option by name.
    ///
    /// The value is inserted and the cache marked dirty only when the option
    /// is absent or its current value differs. Setting a value equal to the
    /// stored one is a no-op, so repeated writes of unchanged values never
    /// cause a flush.
    ///
    /// Equality is strict JSON value equality; `1` and `1.0` are distinct
    /// numbers.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.settings.get(&name) {
            Some(existing) if *existing == value => {}
            _ => {
                self.settings.insert(name, value);
                self.dirty = true;
            }
        }
    }

    /// Serialize and set an option by name.
    ///
    /// Follows the same equality rules as [`set`](Self::set).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the value fails to serialize.
    pub fn set_as<T: Serialize>(&mut self, name: impl Into<String>, value: &T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(|e| Error::Parse(e.to_string()))?;
        self.set(name, value);
        Ok(())
    }

    /// Delete an option by name.
    ///
    /// Deleting an absent option leaves the mapping and the dirty flag
    /// unchanged.
    pub fn delete(&mut self, name: &str) {
        if self.settings.remove(name).is_some() {
            self.dirty = true;
        }
    }

    /// Replace all options at once.
    ///
    /// Unlike [`set`](Self::set) this performs no equality check: the cache
    /// is marked dirty even when `data` equals the current mapping.
    pub fn populate(&mut self, data: HashMap<String, Value>) {
        self.settings = data;
        self.dirty = true;
    }

    /// Get all options
    ///
    /// Read-only view; mutations go through [`set`](Self::set),
    /// [`delete`](Self::delete) or [`populate`](Self::populate).
    pub fn all(&self) -> &HashMap<String, Value> {
        &self.settings
    }

    /// All option names, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.settings.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of options in the mapping
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    /// Whether the mapping holds no options
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Save the record to the backing store unconditionally.
    ///
    /// The dirty flag is cleared before the write: a failed save still counts
    /// as attempted, and the error is surfaced to the caller instead of being
    /// retried on the next flush. Callers needing confirmed persistence must
    /// check the result.
    ///
    /// # Errors
    ///
    /// Returns the store's failure when the write does not complete.
    pub fn save(&mut self) -> Result<()> {
        self.dirty = false;

        let record = Value::Object(
            self.settings
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        );
        self.store.store(&self.record_key, &record)?;

        debug!(
            "Saved {} option(s) to record '{}'",
            self.settings.len(),
            self.record_key
        );
        Ok(())
    }

    /// Save the record only if something changed.
    ///
    /// This is the flush the teardown path relies on: at most one actual
    /// store write per cache lifetime, and none at all when no mutation ever
    /// occurred.
    ///
    /// # Errors
    ///
    /// Returns the store's failure when a flush was needed and did not
    /// complete.
    pub fn maybe_save(&mut self) -> Result<()> {
        if self.dirty { self.save() } else { Ok(()) }
    }
}

impl<S: RecordStore> Drop for SettingsCache<S> {
    fn drop(&mut self) {
        if self.dirty {
            if let Err(e) = self.save() {
                warn!("Failed to flush record '{}' on drop: {e}", self.record_key);
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn empty_cache() -> SettingsCache<MemoryStore> {
        SettingsCache::load(MemoryStore::new(), "plugin_opts").unwrap()
    }

    #[test]
    fn test_starts_empty_and_clean() {
        let cache = empty_cache();

        assert!(cache.is_empty());
        assert!(!cache.is_dirty());
        assert!(!cache.has("x"));
        assert_eq!(cache.get("x"), None);
    }

    #[test]
    fn test_set_and_get() {
        let mut cache = empty_cache();

        cache.set("greeting", "hello");

        assert!(cache.has("greeting"));
        assert_eq!(cache.get("greeting"), Some(&json!("hello")));
        assert!(cache.is_dirty());
    }

    #[test]
    fn test_set_equal_value_keeps_clean() {
        let mut cache = empty_cache();

        cache.set("x", "1");
        cache.save().unwrap();
        assert!(!cache.is_dirty());

        cache.set("x", "1");
        assert!(!cache.is_dirty());
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let mut cache = empty_cache();

        cache.delete("missing");

        assert!(!cache.is_dirty());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_non_object_record_starts_empty() {
        let store = MemoryStore::new();
        store.store("plugin_opts", &json!("not a mapping")).unwrap();

        let cache = SettingsCache::load(store, "plugin_opts").unwrap();

        assert!(cache.is_empty());
        assert!(!cache.is_dirty());
    }
}
