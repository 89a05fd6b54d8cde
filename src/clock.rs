//! Clock Module
//!
//! Injectable time source shared by the cache and the rate limiter so tests
//! can advance virtual time instead of sleeping.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

// == Clock Trait ==
/// Source of "now" for time-dependent components.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

// == System Clock ==
/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// == Manual Clock ==
/// Test clock whose "now" only moves when explicitly advanced.
///
/// Clones share the same underlying instant, so a clone handed to a component
/// observes every `advance` made through the original.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Creates a manual clock starting at the given instant.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    /// Creates a manual clock starting at the current system time.
    pub fn start_now() -> Self {
        Self::new(Utc::now())
    }

    /// Moves the clock forward by the given duration.
    pub fn advance(&self, delta: Duration) {
        let mut current = self.current.lock();
        *current = *current + delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}
