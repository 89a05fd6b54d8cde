//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint, including the rate
//! limit and API key middleware.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;
use tower::ServiceExt;
use tradescope::api::create_router;
use tradescope::services::{AnalysisResult, MarketAnalyzer, MarketData, MarketDataCollector};
use tradescope::{AppState, Config};

// == Helper Functions ==

struct StubCollector;

#[async_trait]
impl MarketDataCollector for StubCollector {
    async fn collect(&self, sector: &str) -> MarketData {
        MarketData {
            sector: sector.to_string(),
            query: format!("{} query", sector),
            snippets: vec!["stub snippet".to_string()],
            collected_at: Utc::now(),
        }
    }
}

struct StubAnalyzer;

#[async_trait]
impl MarketAnalyzer for StubAnalyzer {
    async fn analyze(&self, data: &MarketData) -> AnalysisResult {
        AnalysisResult {
            sector: data.sector.clone(),
            insights: format!("## Market Overview\nStub insights for {}.", data.sector),
            analyzed_at: Utc::now(),
        }
    }
}

fn test_config() -> Config {
    Config {
        server_port: 0,
        rate_limit_per_hour: 10,
        cache_ttl_seconds: 300,
        sweep_interval_seconds: 300,
        gemini_api_key: None,
        api_keys: Vec::new(),
    }
}

fn create_test_app(config: Config) -> Router {
    let state = AppState::new(config, Arc::new(StubCollector), Arc::new(StubAnalyzer));
    create_router(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// == Analyze Endpoint Tests ==

#[tokio::test]
async fn test_analyze_endpoint_fresh_report() {
    let app = create_test_app(test_config());

    let response = app.oneshot(get("/analyze/technology")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["x-ratelimit-limit"].to_str().unwrap(),
        "10"
    );
    assert_eq!(
        response.headers()["x-ratelimit-remaining"]
            .to_str()
            .unwrap(),
        "9"
    );
    assert!(response.headers().contains_key("x-ratelimit-reset"));

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["success"].as_bool().unwrap(), true);
    assert_eq!(json["cached"].as_bool().unwrap(), false);
    assert_eq!(json["sector"].as_str().unwrap(), "technology");
    assert!(json["report"]
        .as_str()
        .unwrap()
        .contains("Trade Opportunity Analysis: Technology"));
    assert!(json.get("generated_at").is_some());
}

#[tokio::test]
async fn test_analyze_endpoint_serves_cache_on_second_call() {
    let app = create_test_app(test_config());

    let first = app
        .clone()
        .oneshot(get("/analyze/agriculture"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first_json = body_to_json(first.into_body()).await;
    assert_eq!(first_json["cached"].as_bool().unwrap(), false);

    let second = app.oneshot(get("/analyze/agriculture")).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    let second_json = body_to_json(second.into_body()).await;
    assert_eq!(second_json["cached"].as_bool().unwrap(), true);
    assert!(second_json["message"].as_str().unwrap().contains("cache"));
}

#[tokio::test]
async fn test_analyze_endpoint_sanitizes_sector() {
    let app = create_test_app(test_config());

    let response = app.oneshot(get("/analyze/Real%20Estate")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["sector"].as_str().unwrap(), "real-estate");
}

#[tokio::test]
async fn test_analyze_endpoint_rejects_unsafe_input() {
    let app = create_test_app(test_config());

    let response = app
        .oneshot(get("/analyze/%3Cscript%3Ealert(1)"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["success"].as_bool().unwrap(), false);
    assert!(json["error"].as_str().unwrap().contains("Invalid sector"));
}

#[tokio::test]
async fn test_analyze_endpoint_rejects_overlong_sector() {
    let app = create_test_app(test_config());

    let uri = format!("/analyze/{}", "x".repeat(60));
    let response = app.oneshot(get(&uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("maximum length"));
}

// == Rate Limit Tests ==

#[tokio::test]
async fn test_rate_limit_exhaustion_returns_429() {
    let mut config = test_config();
    config.rate_limit_per_hour = 2;
    let app = create_test_app(config);

    for _ in 0..2 {
        let response = app.clone().oneshot(get("/analyze/energy")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let rejected = app.oneshot(get("/analyze/energy")).await.unwrap();

    assert_eq!(rejected.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        rejected.headers()["x-ratelimit-remaining"]
            .to_str()
            .unwrap(),
        "0"
    );
    assert!(rejected.headers().contains_key("x-ratelimit-reset"));

    let json = body_to_json(rejected.into_body()).await;
    assert_eq!(json["success"].as_bool().unwrap(), false);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("Rate limit exceeded"));
}

#[tokio::test]
async fn test_rate_limit_remaining_counts_down() {
    let mut config = test_config();
    config.rate_limit_per_hour = 5;
    let app = create_test_app(config);

    let first = app.clone().oneshot(get("/analyze/steel")).await.unwrap();
    assert_eq!(
        first.headers()["x-ratelimit-remaining"].to_str().unwrap(),
        "4"
    );

    let second = app.oneshot(get("/analyze/steel")).await.unwrap();
    assert_eq!(
        second.headers()["x-ratelimit-remaining"].to_str().unwrap(),
        "3"
    );
}

#[tokio::test]
async fn test_rate_limit_skips_health_and_index() {
    let mut config = test_config();
    config.rate_limit_per_hour = 1;
    let app = create_test_app(config);

    // Exhaust the quota on the analyze route
    let accepted = app.clone().oneshot(get("/analyze/textiles")).await.unwrap();
    assert_eq!(accepted.status(), StatusCode::OK);
    let rejected = app.clone().oneshot(get("/analyze/textiles")).await.unwrap();
    assert_eq!(rejected.status(), StatusCode::TOO_MANY_REQUESTS);

    // Health and index stay reachable and carry no quota headers
    for uri in ["/health", "/"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!response.headers().contains_key("x-ratelimit-limit"));
    }
}

// == Authentication Tests ==

fn auth_config() -> Config {
    let mut config = test_config();
    config.api_keys = vec!["secret-key-1".to_string(), "secret-key-2".to_string()];
    config
}

#[tokio::test]
async fn test_auth_missing_key_returns_unauthorized() {
    let app = create_test_app(auth_config());

    let response = app.oneshot(get("/analyze/technology")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers()["www-authenticate"].to_str().unwrap(),
        "ApiKey"
    );
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("API key is required"));
}

#[tokio::test]
async fn test_auth_invalid_key_returns_unauthorized() {
    let app = create_test_app(auth_config());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/analyze/technology")
                .header("x-api-key", "wrong-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("Invalid API key"));
}

#[tokio::test]
async fn test_auth_valid_key_accepted() {
    let app = create_test_app(auth_config());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/analyze/technology")
                .header("x-api-key", "secret-key-2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["success"].as_bool().unwrap(), true);
}

#[tokio::test]
async fn test_auth_rejected_requests_still_consume_quota() {
    let mut config = auth_config();
    config.rate_limit_per_hour = 1;
    let app = create_test_app(config);

    // Unauthenticated request eats the only slot
    let unauthorized = app.clone().oneshot(get("/analyze/mining")).await.unwrap();
    assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);

    // A valid key now hits the rate limit instead
    let response = app
        .oneshot(
            Request::builder()
                .uri("/analyze/mining")
                .header("x-api-key", "secret-key-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

// == Health and Index Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(test_config());

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert_eq!(json["gemini_configured"].as_bool().unwrap(), false);
    assert!(json.get("timestamp").is_some());
}

#[tokio::test]
async fn test_index_endpoint_describes_service() {
    let app = create_test_app(test_config());

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["name"].as_str().unwrap(), "Tradescope API");
    assert_eq!(
        json["version"].as_str().unwrap(),
        env!("CARGO_PKG_VERSION")
    );
    assert_eq!(
        json["endpoints"]["analyze"].as_str().unwrap(),
        "/analyze/{sector}"
    );
    assert_eq!(json["authentication"].as_str().unwrap(), "Not required");
    assert!(json["rate_limit"].as_str().unwrap().contains("per hour"));
}

#[tokio::test]
async fn test_index_endpoint_reports_auth_requirement() {
    let app = create_test_app(auth_config());

    let response = app.oneshot(get("/")).await.unwrap();

    let json = body_to_json(response.into_body()).await;
    assert!(json["authentication"]
        .as_str()
        .unwrap()
        .contains("API key required"));
}

// == Cache Expiry via API Tests ==

#[tokio::test]
async fn test_cache_expiry_via_api() {
    let mut config = test_config();
    config.cache_ttl_seconds = 1;
    let app = create_test_app(config);

    // First call generates and caches
    let first = app.clone().oneshot(get("/analyze/tourism")).await.unwrap();
    let first_json = body_to_json(first.into_body()).await;
    assert_eq!(first_json["cached"].as_bool().unwrap(), false);

    // Immediate second call is served from cache
    let second = app.clone().oneshot(get("/analyze/tourism")).await.unwrap();
    let second_json = body_to_json(second.into_body()).await;
    assert_eq!(second_json["cached"].as_bool().unwrap(), true);

    // Wait for the report to expire
    sleep(Duration::from_millis(1100));

    let third = app.oneshot(get("/analyze/tourism")).await.unwrap();
    let third_json = body_to_json(third.into_body()).await;
    assert_eq!(third_json["cached"].as_bool().unwrap(), false);
}
