//! API Module
//!
//! HTTP handlers, middleware and routing for the analysis REST API.
//!
//! # Endpoints
//! - `GET /` - Service metadata
//! - `GET /health` - Health check endpoint
//! - `GET /analyze/:sector` - Sector analysis

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
