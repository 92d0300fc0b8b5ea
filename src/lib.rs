//! # optcache - deferred write-back option caching
//!
//! A small, framework-agnostic library for components that keep all of their
//! settings in a single persisted record: the whole record is read once, every
//! individual option is served and mutated in memory, and the record is
//! written back at most once per lifecycle, and only when something actually
//! changed.
//!
//! ## Features
//!
//! - **Single-record overlay**: individual `get`/`set`/`delete` over one
//!   opaque key/value blob
//! - **Mutation tracking**: a dirty flag set only by real changes; rewriting
//!   an unchanged value never triggers a flush
//! - **Deferred flush**: [`SettingsCache::maybe_save`] writes only when
//!   dirty, and a dirty cache flushes itself when dropped
//! - **Pluggable stores**: JSON files out of the box, or any
//!   [`RecordStore`] implementation (host database, in-memory, ...)
//! - **Typed access**: serde-backed [`get_as`](SettingsCache::get_as) /
//!   [`set_as`](SettingsCache::set_as) next to the raw JSON value API
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use optcache::{JsonFileStore, SettingsCache};
//!
//! # fn example() -> optcache::Result<()> {
//! let store = JsonFileStore::for_app("my-plugin");
//! let mut cache = SettingsCache::load(store, "plugin_opts")?;
//!
//! if !cache.has("greeting") {
//!     cache.set("greeting", "hello");
//! }
//! cache.set("retries", 3);
//!
//! // Nothing has been written yet; the record is flushed once, either here
//! // or automatically when `cache` is dropped.
//! cache.maybe_save()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Flush semantics
//!
//! [`save`](SettingsCache::save) is the unconditional primitive: it always
//! writes and clears the dirty flag before doing so, surfacing the store's
//! result to the caller. [`maybe_save`](SettingsCache::maybe_save) is the
//! conditional flush that teardown relies on. Because a successful (or even
//! attempted) flush clears the flag, an explicit `maybe_save` followed by the
//! drop of the cache performs exactly one store write.
//!
//! Multiple caches over the same record key are intentionally uncoordinated:
//! the last writer at flush time wins. Hosts needing stronger guarantees must
//! wrap the cache in their own transaction layer.

mod cache;
mod error;
pub mod store;

pub use cache::SettingsCache;
pub use error::{Error, Result};
pub use store::{JsonFileStore, MemoryStore, RecordStore};
