//! Maintenance Task
//!
//! Background task that periodically sweeps expired cached reports and
//! idle rate limiter entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::TtlCache;
use crate::limiter::RateLimiter;

/// Spawns a background task that periodically sweeps both shared structures.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. Each sweep drops expired report cache entries and rate
/// limiter windows that have gone idle for a full window.
///
/// # Arguments
/// * `cache` - Shared report cache
/// * `limiter` - Shared rate limiter
/// * `sweep_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let handle = spawn_maintenance_task(state.cache.clone(), state.limiter.clone(), 300);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_maintenance_task(
    cache: Arc<TtlCache<String>>,
    limiter: Arc<RateLimiter>,
    sweep_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting maintenance task with interval of {} seconds",
            sweep_interval_secs
        );

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            let expired = cache.sweep();
            let idle = limiter.sweep_idle();

            if expired > 0 || idle > 0 {
                info!(
                    "Maintenance sweep: removed {} expired reports and {} idle clients",
                    expired, idle
                );
            } else {
                debug!("Maintenance sweep: nothing to remove");
            }
        }
    })
}
