//! Caller-owned fingerprint cache
//!
//! Fingerprints are cheap but not free to recompute over a large library.
//! [`FingerprintCache`] memoizes them by a stable document id (a bookmark or
//! note id, for example). The cache never notices edits on its own: callers
//! must [`invalidate`](FingerprintCache::invalidate) an id whenever that
//! document's content changes.
//!
//! The cache is an ordinary value. Create one where it is needed and share it
//! by reference; it is safe to use from several threads at once.

use crate::collections::{HashMap, HashMapExt};
use crate::simhash::{FingerprintBuilder, SimHash64};
use parking_lot::RwLock;
use tracing::trace;

/// Memoized fingerprints keyed by document id
///
/// # Example
///
/// ```rust
/// use timeseal::FingerprintCache;
///
/// let cache = FingerprintCache::new();
/// let first = cache.get_or_compute("note-1", "Rust ownership and borrowing");
/// // Stale content is ignored until the id is invalidated.
/// assert_eq!(cache.get_or_compute("note-1", "something else entirely"), first);
///
/// cache.invalidate("note-1");
/// assert_ne!(cache.get_or_compute("note-1", "something else entirely"), first);
/// ```
#[derive(Debug, Default)]
pub struct FingerprintCache {
    builder: FingerprintBuilder,
    entries: RwLock<HashMap<String, SimHash64>>,
}

impl FingerprintCache {
    /// Create an empty cache using the default tokenizer
    pub fn new() -> Self {
        Self::with_builder(FingerprintBuilder::new())
    }

    /// Create an empty cache that computes fingerprints with `builder`
    pub fn with_builder(builder: FingerprintBuilder) -> Self {
        Self {
            builder,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Cached fingerprint for `id`, if any
    pub fn get(&self, id: &str) -> Option<SimHash64> {
        self.entries.read().get(id).copied()
    }

    /// Return the cached fingerprint for `id`, computing it from `content` on a miss
    pub fn get_or_compute(&self, id: &str, content: &str) -> SimHash64 {
        if let Some(hit) = self.get(id) {
            trace!("Fingerprint cache hit for {}", id);
            return hit;
        }

        let fingerprint = self.builder.fingerprint(content);
        *self
            .entries
            .write()
            .entry(id.to_string())
            .or_insert(fingerprint)
    }

    /// Store a fingerprint computed elsewhere (e.g. loaded from storage)
    pub fn insert(&self, id: impl Into<String>, fingerprint: SimHash64) {
        self.entries.write().insert(id.into(), fingerprint);
    }

    /// Forget the fingerprint for `id`; returns it if one was cached
    pub fn invalidate(&self, id: &str) -> Option<SimHash64> {
        self.entries.write().remove(id)
    }

    /// Forget everything
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of cached fingerprints
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Snapshot of all `(id, fingerprint)` pairs, sorted by id
    pub fn snapshot(&self) -> Vec<(String, SimHash64)> {
        let mut entries: Vec<(String, SimHash64)> = self
            .entries
            .read()
            .iter()
            .map(|(id, f)| (id.clone(), *f))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}
