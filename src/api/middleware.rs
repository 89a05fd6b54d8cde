//! API Middleware
//!
//! Rate limiting and API key checks applied in front of the analyze route.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::error::{ApiError, HEADER_RATE_LIMIT, HEADER_RATE_REMAINING, HEADER_RATE_RESET};
use crate::limiter::RateDecision;

use super::handlers::AppState;

/// Identifies the client for rate accounting.
///
/// Uses the peer IP when the server was started with connect info, otherwise
/// a shared fallback identifier.
fn client_identifier(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware enforcing the hourly per-client request quota.
///
/// Rejected requests are answered with 429 without running the inner stack.
/// Accepted requests get the quota headers stamped on their response.
pub async fn enforce_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let identifier = client_identifier(&request);

    match state.limiter.check_and_record(&identifier) {
        RateDecision::Rejected { retry_at } => {
            warn!(identifier = %identifier, "rate limit exceeded");
            ApiError::RateLimited {
                limit: state.limiter.limit(),
                retry_at,
            }
            .into_response()
        }
        RateDecision::Accepted {
            remaining,
            reset_at,
        } => {
            debug!(identifier = %identifier, remaining, "request within rate limit");
            let mut response = next.run(request).await;

            let headers = response.headers_mut();
            headers.insert(HEADER_RATE_LIMIT, HeaderValue::from(state.limiter.limit()));
            headers.insert(HEADER_RATE_REMAINING, HeaderValue::from(remaining));
            if let Ok(value) = HeaderValue::from_str(&reset_at.to_rfc3339()) {
                headers.insert(HEADER_RATE_RESET, value);
            }
            response
        }
    }
}

/// Middleware requiring a valid `x-api-key` header.
///
/// Passes every request through unchanged when no keys are configured.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.auth_enabled() {
        return next.run(request).await;
    }

    let provided = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok());

    match provided {
        None => ApiError::MissingApiKey.into_response(),
        Some(key) if !state.config.is_valid_api_key(key) => {
            let prefix: String = key.chars().take(8).collect();
            warn!(key_prefix = %prefix, "rejected invalid API key");
            ApiError::InvalidApiKey.into_response()
        }
        Some(_) => next.run(request).await,
    }
}
