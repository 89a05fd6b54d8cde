//! Response DTOs for the analysis API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

/// Response body for the analyze endpoint (GET /analyze/:sector)
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    /// Always true for successful analyses
    pub success: bool,
    /// Sanitized sector the report covers
    pub sector: String,
    /// Markdown report body
    pub report: String,
    /// True when the report was served from the cache
    pub cached: bool,
    /// Timestamp of this response in ISO 8601 format
    pub generated_at: String,
    /// Human-readable outcome message
    pub message: String,
}

impl AnalysisResponse {
    /// Creates a response for a freshly generated report.
    pub fn fresh(sector: impl Into<String>, report: impl Into<String>) -> Self {
        Self {
            success: true,
            sector: sector.into(),
            report: report.into(),
            cached: false,
            generated_at: chrono::Utc::now().to_rfc3339(),
            message: "Analysis completed successfully".to_string(),
        }
    }

    /// Creates a response for a report served from the cache.
    pub fn from_cache(sector: impl Into<String>, report: impl Into<String>) -> Self {
        Self {
            success: true,
            sector: sector.into(),
            report: report.into(),
            cached: true,
            generated_at: chrono::Utc::now().to_rfc3339(),
            message: "Analysis retrieved from cache".to_string(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Always false for errors
    pub success: bool,
    /// Error message describing what went wrong
    pub error: String,
    /// Optional additional context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            detail: None,
        }
    }

    /// Creates a new ErrorResponse with additional context
    pub fn with_detail(error: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            detail: Some(detail.into()),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Whether a generative model credential is configured
    pub gemini_configured: bool,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(gemini_configured: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            gemini_configured,
        }
    }
}

/// Response body for the service index (GET /)
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    /// Service name
    pub name: String,
    /// Crate version
    pub version: String,
    /// Short service description
    pub description: String,
    /// Available endpoints
    pub endpoints: EndpointMap,
    /// Authentication mode for this deployment
    pub authentication: String,
    /// Rate limit summary
    pub rate_limit: String,
    /// Note on accepted sector names
    pub sectors: String,
}

/// Endpoint paths advertised by the service index
#[derive(Debug, Clone, Serialize)]
pub struct EndpointMap {
    pub analyze: String,
    pub health: String,
}

impl ServiceInfo {
    /// Creates the service index payload for the current deployment.
    pub fn new(rate_limit_per_hour: u32, auth_enabled: bool) -> Self {
        Self {
            name: "Tradescope API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "Market sector analysis with cached reports and per-client rate limiting"
                .to_string(),
            endpoints: EndpointMap {
                analyze: "/analyze/{sector}".to_string(),
                health: "/health".to_string(),
            },
            authentication: if auth_enabled {
                "API key required (x-api-key header)".to_string()
            } else {
                "Not required".to_string()
            },
            rate_limit: format!("{} requests per hour per client", rate_limit_per_hour),
            sectors: "Any sector name; it is sanitized before analysis".to_string(),
        }
    }
}
