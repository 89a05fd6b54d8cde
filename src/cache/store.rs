//! Cache Store Module
//!
//! In-memory TTL cache guarding a single map with one mutex. Expired entries
//! are evicted lazily on read; the background maintenance task reclaims the
//! rest via `sweep`.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use crate::cache::CacheEntry;
use crate::clock::{Clock, SystemClock};

// == TTL Cache ==
/// Thread-safe key-value store with per-entry absolute expiry.
///
/// All operations take `&self`; the internal mutex serializes every
/// read-modify-write sequence. Nothing inside a critical section performs
/// I/O, so lock hold times stay bounded by the map operation itself.
pub struct TtlCache<V> {
    /// Key-value storage
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    /// TTL in seconds applied when `set` receives no explicit TTL
    default_ttl_seconds: u64,
    /// Time source; injectable so tests control expiry deterministically
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    // == Constructors ==
    /// Creates a cache with the given default TTL, using the system clock.
    pub fn new(default_ttl_seconds: u64) -> Self {
        Self::with_clock(default_ttl_seconds, Arc::new(SystemClock))
    }

    /// Creates a cache with the given default TTL and time source.
    pub fn with_clock(default_ttl_seconds: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_ttl_seconds,
            clock,
        }
    }

    // == Get ==
    /// Retrieves the value stored under `key`, if any.
    ///
    /// An entry whose expiry has passed is removed as part of this call and
    /// reported as absent; callers cannot distinguish expired from missing.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        if let Some(entry) = entries.get(key) {
            if !entry.is_expired(now) {
                return Some(entry.value.clone());
            }
            // Lazy eviction: drop the stale entry while we hold the lock
            entries.remove(key);
        }
        None
    }

    // == Set ==
    /// Stores `value` under `key` with the given TTL in seconds.
    ///
    /// Overwrites any existing entry unconditionally and resets its expiry.
    /// Falls back to the configured default TTL when `ttl_seconds` is `None`.
    pub fn set(&self, key: impl Into<String>, value: V, ttl_seconds: Option<u64>) {
        let ttl = ttl_seconds.unwrap_or(self.default_ttl_seconds);
        let expires_at = self.clock.now() + Duration::seconds(ttl as i64);

        let mut entries = self.entries.lock();
        entries.insert(key.into(), CacheEntry::new(value, expires_at));
    }

    // == Delete ==
    /// Removes the entry under `key`; no-op when the key is absent.
    pub fn delete(&self, key: &str) {
        let mut entries = self.entries.lock();
        entries.remove(key);
    }

    // == Clear ==
    /// Removes all entries.
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        entries.clear();
    }

    // == Sweep ==
    /// Removes every expired entry and returns the count removed.
    ///
    /// Used by the periodic maintenance task, never on the request path.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    // == Length ==
    /// Returns the current number of entries, including any not yet swept.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

// == Key Derivation ==
/// Builds a deterministic cache key from a namespace and ordered parts.
///
/// The namespace and each part feed a SHA-256 digest with a separator in
/// between, so the same inputs always map to the same key and reordered or
/// differing inputs diverge. The hex digest doubles as a fixed-width key.
pub fn generate_key(namespace: &str, parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    for part in parts {
        hasher.update(b":");
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}
