//! API Handlers
//!
//! HTTP request handlers for each analysis endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::cache::{generate_key, TtlCache};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::limiter::RateLimiter;
use crate::models::{AnalysisResponse, HealthResponse, ServiceInfo};
use crate::sanitize::{is_safe_input, sanitize_sector, validate_sector_length};
use crate::services::{
    render_report, GeminiAnalyzer, MarketAnalyzer, MarketDataCollector, WebSearchCollector,
};

/// Application state shared across all handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    /// Rendered report cache keyed by sector
    pub cache: Arc<TtlCache<String>>,
    /// Per-client sliding window rate limiter
    pub limiter: Arc<RateLimiter>,
    /// Market data source
    pub collector: Arc<dyn MarketDataCollector>,
    /// Insight generator
    pub analyzer: Arc<dyn MarketAnalyzer>,
    /// Runtime configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates state with explicit collector and analyzer implementations.
    pub fn new(
        config: Config,
        collector: Arc<dyn MarketDataCollector>,
        analyzer: Arc<dyn MarketAnalyzer>,
    ) -> Self {
        Self {
            cache: Arc::new(TtlCache::new(config.cache_ttl_seconds)),
            limiter: Arc::new(RateLimiter::new(config.rate_limit_per_hour)),
            collector,
            analyzer,
            config: Arc::new(config),
        }
    }

    /// Creates state from configuration with the production services wired in.
    pub fn from_config(config: &Config) -> Self {
        let collector = Arc::new(WebSearchCollector::new());
        let analyzer = Arc::new(GeminiAnalyzer::new(config.gemini_api_key.clone()));
        Self::new(config.clone(), collector, analyzer)
    }
}

/// Handler for GET /analyze/:sector
///
/// Validates and sanitizes the sector name, serves the cached report when a
/// fresh one exists, and otherwise runs the collect-analyze-render pipeline
/// and caches the result.
pub async fn analyze_sector(
    State(state): State<AppState>,
    Path(sector): Path<String>,
) -> Result<Json<AnalysisResponse>> {
    if !is_safe_input(&sector) {
        return Err(ApiError::InvalidSector(
            "potentially unsafe characters detected".to_string(),
        ));
    }

    let sanitized = sanitize_sector(&sector).ok_or_else(|| {
        ApiError::InvalidSector("sector name is empty after sanitization".to_string())
    })?;

    if let Some(message) = validate_sector_length(&sanitized) {
        return Err(ApiError::InvalidSector(message));
    }

    let cache_key = generate_key("analysis", &[&sanitized]);

    if let Some(report) = state.cache.get(&cache_key) {
        info!(sector = %sanitized, "serving cached analysis");
        return Ok(Json(AnalysisResponse::from_cache(sanitized, report)));
    }

    info!(sector = %sanitized, "generating fresh analysis");
    let data = state.collector.collect(&sanitized).await;
    let result = state.analyzer.analyze(&data).await;
    let report = render_report(&result);

    state.cache.set(cache_key, report.clone(), None);

    Ok(Json(AnalysisResponse::fresh(sanitized, report)))
}

/// Handler for GET /health
///
/// Returns service health and whether a model credential is configured.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.config.gemini_api_key.is_some()))
}

/// Handler for GET /
///
/// Returns service metadata and usage hints.
pub async fn index_handler(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo::new(
        state.config.rate_limit_per_hour,
        state.config.auth_enabled(),
    ))
}
