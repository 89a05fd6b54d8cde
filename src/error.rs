//! Error types for the analysis API
//!
//! Provides unified error handling using thiserror. Rate-limit rejections are
//! mapped here into 429 responses carrying the standard quota headers.

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Rate Limit Headers ==
/// Quota ceiling header
pub const HEADER_RATE_LIMIT: &str = "x-ratelimit-limit";
/// Remaining quota header
pub const HEADER_RATE_REMAINING: &str = "x-ratelimit-remaining";
/// Window reset timestamp header (ISO-8601)
pub const HEADER_RATE_RESET: &str = "x-ratelimit-reset";

// == API Error Enum ==
/// Unified error type for the analysis API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Sector name failed screening or sanitization
    #[error("Invalid sector name: {0}")]
    InvalidSector(String),

    /// Authentication enabled but no key presented
    #[error("API key is required. Provide the x-api-key header.")]
    MissingApiKey,

    /// Presented key is not on the allow-list
    #[error("Invalid API key. Please check your credentials.")]
    InvalidApiKey,

    /// Request over the hourly ceiling
    #[error("Rate limit exceeded. Limit: {limit} requests per hour. Try again after {retry_at}")]
    RateLimited {
        limit: u32,
        retry_at: DateTime<Utc>,
    },

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::InvalidSector(_) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(self.to_string()))
            }
            ApiError::MissingApiKey | ApiError::InvalidApiKey => {
                (StatusCode::UNAUTHORIZED, ErrorResponse::new(self.to_string()))
            }
            ApiError::RateLimited { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorResponse::new(self.to_string()),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_detail("Internal server error", msg.clone()),
            ),
        };

        let mut response = (status, Json(body)).into_response();

        match self {
            ApiError::RateLimited { limit, retry_at } => {
                let headers = response.headers_mut();
                headers.insert(HEADER_RATE_LIMIT, HeaderValue::from(limit));
                headers.insert(HEADER_RATE_REMAINING, HeaderValue::from(0u32));
                if let Ok(reset) = HeaderValue::from_str(&retry_at.to_rfc3339()) {
                    headers.insert(HEADER_RATE_RESET, reset);
                }
            }
            ApiError::MissingApiKey | ApiError::InvalidApiKey => {
                response
                    .headers_mut()
                    .insert(WWW_AUTHENTICATE, HeaderValue::from_static("ApiKey"));
            }
            _ => {}
        }

        response
    }
}

// == Result Type Alias ==
/// Convenience Result type for the analysis API.
pub type Result<T> = std::result::Result<T, ApiError>;
