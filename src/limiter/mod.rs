//! Rate Limiter Module
//!
//! Sliding-window request limiter tracking per-identifier request
//! timestamps over the trailing hour.

mod registry;
mod window;


// Re-export public types
pub use registry::{RateDecision, RateLimiter};
pub use window::RequestWindow;

// == Public Constants ==
/// Length of the rolling admission window in seconds
pub const WINDOW_SECONDS: i64 = 3_600;
