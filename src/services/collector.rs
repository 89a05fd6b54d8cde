//! Market Data Collector Module
//!
//! Gathers open-web search snippets for a sector via the DuckDuckGo Instant
//! Answer API. Failures and empty results degrade to deterministic fallback
//! snippets so the pipeline always has material to analyze.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

// == Constants ==
const SEARCH_ENDPOINT: &str = "https://api.duckduckgo.com/";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Maximum snippets carried into analysis
pub const MAX_SEARCH_RESULTS: usize = 15;

// == Market Data ==
/// Raw material for one sector analysis.
#[derive(Debug, Clone)]
pub struct MarketData {
    /// Sanitized sector the data covers
    pub sector: String,
    /// Search query that produced the snippets
    pub query: String,
    /// Formatted search snippets, best first
    pub snippets: Vec<String>,
    /// Collection timestamp
    pub collected_at: DateTime<Utc>,
}

// == Collector Trait ==
/// Supplies market data for a sector.
#[async_trait]
pub trait MarketDataCollector: Send + Sync {
    /// Collects snippets for `sector`. Never fails; implementations fall
    /// back to canned material when their upstream is unavailable.
    async fn collect(&self, sector: &str) -> MarketData;
}

// == Web Search Collector ==
/// Collector backed by the DuckDuckGo Instant Answer API.
pub struct WebSearchCollector {
    http: reqwest::Client,
    max_results: usize,
}

impl WebSearchCollector {
    /// Creates a collector with the default result cap.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            max_results: MAX_SEARCH_RESULTS,
        }
    }

    /// Runs the search and flattens the response into formatted snippets.
    async fn search(&self, query: &str) -> Result<Vec<String>, reqwest::Error> {
        let response = self
            .http
            .get(SEARCH_ENDPOINT)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .send()
            .await?
            .error_for_status()?;

        let parsed: SearchResponse = response.json().await?;
        Ok(flatten_snippets(parsed, self.max_results))
    }
}

impl Default for WebSearchCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataCollector for WebSearchCollector {
    async fn collect(&self, sector: &str) -> MarketData {
        let query = build_query(sector);

        let snippets = match self.search(&query).await {
            Ok(snippets) if !snippets.is_empty() => {
                debug!(sector, count = snippets.len(), "collected web snippets");
                snippets
            }
            Ok(_) => {
                warn!(sector, "web search returned no results, using fallback data");
                fallback_snippets(sector)
            }
            Err(err) => {
                warn!(error = %err, sector, "web search failed, using fallback data");
                fallback_snippets(sector)
            }
        };

        MarketData {
            sector: sector.to_string(),
            query,
            snippets,
            collected_at: Utc::now(),
        }
    }
}

// == Query Construction ==
/// Builds the search query for a sector.
pub fn build_query(sector: &str) -> String {
    format!(
        "{} sector India market analysis trends opportunities investment 2024 2025 trade export import",
        sector
    )
}

// == Fallback Data ==
/// Deterministic snippets used when the search upstream is unavailable.
pub fn fallback_snippets(sector: &str) -> Vec<String> {
    vec![
        format!(
            "The {} sector in India continues to show growth potential driven by domestic demand and policy support.",
            sector
        ),
        format!(
            "Government initiatives and production-linked incentives are encouraging investment in the {} sector.",
            sector
        ),
        format!(
            "Export opportunities for the {} sector are expanding across regional and global trade corridors.",
            sector
        ),
        format!(
            "Institutional and foreign investors have shown rising interest in Indian {} companies.",
            sector
        ),
        format!(
            "Digital adoption and supply-chain modernization are reshaping operations across the {} sector.",
            sector
        ),
    ]
}

// == Response Flattening ==
/// Instant Answer API response; only the fields we read.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

/// Related topics nest one level under category groupings.
#[derive(Debug, Deserialize)]
struct RelatedTopic {
    #[serde(rename = "Text", default)]
    text: String,
    #[serde(rename = "FirstURL", default)]
    first_url: String,
    #[serde(rename = "Topics", default)]
    topics: Vec<RelatedTopic>,
}

/// Flattens abstract and related topics into at most `cap` snippets.
fn flatten_snippets(response: SearchResponse, cap: usize) -> Vec<String> {
    let mut snippets = Vec::new();

    if !response.abstract_text.is_empty() {
        snippets.push(format_snippet(
            &response.abstract_text,
            &response.abstract_url,
        ));
    }
    push_topics(&response.related_topics, &mut snippets, cap);

    snippets
}

fn push_topics(topics: &[RelatedTopic], snippets: &mut Vec<String>, cap: usize) {
    for topic in topics {
        if snippets.len() >= cap {
            return;
        }
        if !topic.text.is_empty() {
            snippets.push(format_snippet(&topic.text, &topic.first_url));
        }
        push_topics(&topic.topics, snippets, cap);
    }
}

fn format_snippet(text: &str, url: &str) -> String {
    if url.is_empty() {
        text.to_string()
    } else {
        format!("{}\nSource: {}", text, url)
    }
}
