//! Request Window Module
//!
//! Per-identifier record of request timestamps inside the rolling window.

use chrono::{DateTime, Utc};

// == Request Window ==
/// Ordered timestamps of the requests an identifier made within the window.
///
/// The registry wraps each window in its own mutex; the window itself is just
/// the timestamp bookkeeping.
#[derive(Debug, Default)]
pub struct RequestWindow {
    /// Request instants, oldest first
    timestamps: Vec<DateTime<Utc>>,
}

impl RequestWindow {
    // == Prune ==
    /// Drops every timestamp at or before `cutoff`.
    ///
    /// A timestamp exactly one window old no longer counts, so the cutoff
    /// comparison is exclusive.
    pub fn prune(&mut self, cutoff: DateTime<Utc>) {
        self.timestamps.retain(|&t| t > cutoff);
    }

    // == Record ==
    /// Appends a request timestamp.
    ///
    /// Callers record monotonically non-decreasing instants, keeping the
    /// vector ordered oldest first.
    pub fn record(&mut self, at: DateTime<Utc>) {
        self.timestamps.push(at);
    }

    /// Number of timestamps currently retained.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Returns true when no timestamps are retained.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Earliest retained timestamp, if any.
    pub fn oldest(&self) -> Option<DateTime<Utc>> {
        self.timestamps.first().copied()
    }
}
