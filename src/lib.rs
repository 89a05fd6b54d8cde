//! Tradescope - Market sector analysis API
//!
//! Serves cached trade opportunity reports per sector with per-client
//! rate limiting.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod limiter;
pub mod models;
pub mod sanitize;
pub mod services;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_maintenance_task;
