//! API Routes
//!
//! Configures the Axum router with all analysis endpoints.

use axum::{middleware::from_fn_with_state, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{analyze_sector, health_handler, index_handler, AppState};
use super::middleware::{enforce_rate_limit, require_api_key};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /` - Service metadata
/// - `GET /health` - Health check endpoint
/// - `GET /analyze/:sector` - Sector analysis (rate limited, API key checked)
///
/// # Middleware
/// - CORS: Allows any origin and exposes the rate limit headers
/// - Tracing: Logs all requests for debugging
///
/// Only the analyze route carries the rate limit and API key layers. The
/// rate limit check runs before the key check, so unauthenticated requests
/// still consume quota.
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    // Last-added route layer is outermost, so the rate limit wraps the key check
    let analyze = Router::new()
        .route("/analyze/:sector", get(analyze_sector))
        .route_layer(from_fn_with_state(state.clone(), require_api_key))
        .route_layer(from_fn_with_state(state.clone(), enforce_rate_limit));

    // Build router with all endpoints
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .merge(analyze)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
