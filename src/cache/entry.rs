//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with absolute expiry.

use chrono::{DateTime, Utc};

// == Cache Entry ==
/// A stored value together with the instant it stops being readable.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Expiration timestamp
    pub expires_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry expiring at the given instant.
    pub fn new(value: V, expires_at: DateTime<Utc>) -> Self {
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry is considered expired when `now` is
    /// greater than or equal to the expiration time, so a reader never sees
    /// a value whose full TTL has elapsed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
