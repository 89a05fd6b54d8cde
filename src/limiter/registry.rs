//! Rate Limiter Registry Module
//!
//! Maps identifiers to their request windows and makes the admission
//! decisions. Two locking scopes: a registry `RwLock` serializing entry
//! creation, and one `Mutex` per window so unrelated identifiers never
//! contend. The registry lock is always taken before a window lock, never
//! the other way around.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::{Mutex, RwLock};

use crate::clock::{Clock, SystemClock};
use crate::limiter::{RequestWindow, WINDOW_SECONDS};

// == Rate Decision ==
/// Outcome of an admission check.
///
/// Rejection is expected control flow, not a fault; it carries what the
/// caller needs to build a "too many requests" response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateDecision {
    /// Request admitted and recorded
    Accepted {
        /// Slots left in the window after this request
        remaining: u32,
        /// When the earliest recorded request leaves the window
        reset_at: DateTime<Utc>,
    },
    /// Request over the ceiling for this window
    Rejected {
        /// When the earliest in-window request ages out and a slot frees up
        retry_at: DateTime<Utc>,
    },
}

impl RateDecision {
    /// Returns true for the `Accepted` variant.
    pub fn is_accepted(&self) -> bool {
        matches!(self, RateDecision::Accepted { .. })
    }
}

// == Rate Limiter ==
/// Sliding-window limiter enforcing a fixed hourly ceiling per identifier.
///
/// The ceiling is set once at construction and shared by every identifier.
/// Unknown identifiers start with full quota; their windows are created on
/// first sight.
pub struct RateLimiter {
    /// Hourly ceiling shared by all identifiers
    limit: u32,
    /// Identifier registry; each window carries its own lock
    entries: RwLock<HashMap<String, Arc<Mutex<RequestWindow>>>>,
    /// Time source; injectable so tests control the window deterministically
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    // == Constructors ==
    /// Creates a limiter with the given hourly ceiling, using the system clock.
    pub fn new(limit_per_hour: u32) -> Self {
        Self::with_clock(limit_per_hour, Arc::new(SystemClock))
    }

    /// Creates a limiter with the given hourly ceiling and time source.
    pub fn with_clock(limit_per_hour: u32, clock: Arc<dyn Clock>) -> Self {
        Self {
            limit: limit_per_hour,
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// The configured hourly ceiling.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    // == Check And Record ==
    /// Admits or rejects a request for `identifier`, recording it if admitted.
    ///
    /// Prunes the identifier's window to the trailing hour, then compares the
    /// count against the ceiling. An admitted call counts toward the limit
    /// immediately. The window lock is held across the whole check-then-record
    /// so two callers racing for the last slot cannot both be admitted.
    pub fn check_and_record(&self, identifier: &str) -> RateDecision {
        let entry = self.entry_for(identifier);
        let now = self.clock.now();

        let mut window = entry.lock();
        window.prune(now - Self::window());

        if (window.len() as u32) < self.limit {
            window.record(now);
            RateDecision::Accepted {
                remaining: self.limit - window.len() as u32,
                reset_at: Self::reset_from(&window, now),
            }
        } else {
            RateDecision::Rejected {
                retry_at: Self::reset_from(&window, now),
            }
        }
    }

    // == Remaining ==
    /// Slots left in the identifier's current window, floored at zero.
    ///
    /// Prunes before counting; never records a request. Unknown identifiers
    /// report the full ceiling.
    pub fn remaining(&self, identifier: &str) -> u32 {
        match self.existing_entry(identifier) {
            Some(entry) => {
                let now = self.clock.now();
                let mut window = entry.lock();
                window.prune(now - Self::window());
                self.limit.saturating_sub(window.len() as u32)
            }
            None => self.limit,
        }
    }

    // == Reset Time ==
    /// When the identifier's earliest in-window request ages out.
    ///
    /// Falls back to "now plus one window" when nothing is recorded, so the
    /// result is always a usable retry hint.
    pub fn reset_time(&self, identifier: &str) -> DateTime<Utc> {
        let now = self.clock.now();
        match self.existing_entry(identifier) {
            Some(entry) => {
                let mut window = entry.lock();
                window.prune(now - Self::window());
                Self::reset_from(&window, now)
            }
            None => now + Self::window(),
        }
    }

    // == Sweep Idle ==
    /// Removes registry entries whose windows are empty after pruning.
    ///
    /// Returns the count removed. Entries still referenced by an in-flight
    /// caller are kept so a concurrent `check_and_record` never writes into
    /// an unlinked window; the next sweep picks them up.
    pub fn sweep_idle(&self) -> usize {
        let cutoff = self.clock.now() - Self::window();
        let mut entries = self.entries.write();

        let before = entries.len();
        entries.retain(|_, entry| {
            if Arc::strong_count(entry) > 1 {
                return true;
            }
            let mut window = entry.lock();
            window.prune(cutoff);
            !window.is_empty()
        });
        before - entries.len()
    }

    // == Tracked Identifiers ==
    /// Number of identifiers currently registered.
    pub fn tracked_identifiers(&self) -> usize {
        self.entries.read().len()
    }

    /// Fetches the window for `identifier`, creating it on first sight.
    ///
    /// Read-lock fast path for known identifiers; otherwise the write lock is
    /// taken and the entry API re-checks under it, so two first-time callers
    /// converge on a single window instead of one overwriting the other.
    fn entry_for(&self, identifier: &str) -> Arc<Mutex<RequestWindow>> {
        {
            let entries = self.entries.read();
            if let Some(entry) = entries.get(identifier) {
                return Arc::clone(entry);
            }
        }

        let mut entries = self.entries.write();
        Arc::clone(entries.entry(identifier.to_string()).or_default())
    }

    /// Fetches the window for `identifier` without creating one.
    fn existing_entry(&self, identifier: &str) -> Option<Arc<Mutex<RequestWindow>>> {
        self.entries.read().get(identifier).map(Arc::clone)
    }

    fn window() -> Duration {
        Duration::seconds(WINDOW_SECONDS)
    }

    fn reset_from(window: &RequestWindow, now: DateTime<Utc>) -> DateTime<Utc> {
        window
            .oldest()
            .map(|t| t + Self::window())
            .unwrap_or(now + Self::window())
    }
}
