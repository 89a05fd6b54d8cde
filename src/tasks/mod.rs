//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Maintenance: sweeps expired cached reports and idle rate limiter
//!   entries at configured intervals

mod maintenance;

pub use maintenance::spawn_maintenance_task;
