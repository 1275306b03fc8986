//! Resource cache: de-duplicates load attempts by resource key.
//!
//! The cache memoizes the *outcome* of the first load for each key —
//! success or failure — and hands every later requester the same shared
//! entry without invoking the loader again. Shared background images and
//! repeated assets therefore cost exactly one fetch.
//!
//! The cache is owned by the load worker and only ever touched from that
//! thread, which is what makes the at-most-one-fetch-per-key guarantee
//! structural: there is no second thread that could race a key into a
//! duplicate fetch, so no locking is needed.
//!
//! There is no expiry policy. The set of media items per page is bounded,
//! so entries simply live until [`ResourceCache::clear`] at teardown.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::LoadError;
use crate::loader::ResolvedResource;
use crate::media::ResourceKey;

/// Memoized outcome of a load attempt, shared by every requester of a key.
///
/// Failures are memoized too: a requester arriving after a failed load
/// observes that same failure, not a fresh attempt.
pub type CacheEntry = Arc<Result<ResolvedResource, LoadError>>;

/// De-duplicating store of load outcomes, keyed by resource key.
#[derive(Debug, Default)]
pub struct ResourceCache {
    entries: HashMap<ResourceKey, CacheEntry>,
}

impl ResourceCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the entry for `key`, invoking `load` only if none exists.
    ///
    /// The loader runs inline on the caller's thread; its result (either
    /// way) becomes the permanent entry for `key`.
    pub fn get_or_load<F>(&mut self, key: &ResourceKey, load: F) -> CacheEntry
    where
        F: FnOnce() -> Result<ResolvedResource, LoadError>,
    {
        if let Some(entry) = self.entries.get(key) {
            log::trace!("cache hit for {key}");
            return Arc::clone(entry);
        }

        log::debug!("cache miss for {key}, fetching");
        let entry: CacheEntry = Arc::new(load());
        self.entries.insert(key.clone(), Arc::clone(&entry));
        entry
    }

    /// Whether an entry (completed, success or failure) exists for `key`.
    pub fn has(&self, key: &ResourceKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of memoized entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry. Used at teardown and by hosts that re-key their
    /// content wholesale.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
