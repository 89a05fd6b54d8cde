//! Cache Module
//!
//! Provides the in-memory TTL cache for analysis reports and the
//! deterministic cache key derivation.

mod entry;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use store::{generate_key, TtlCache};
