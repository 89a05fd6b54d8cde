//! Market Analyzer Module
//!
//! Turns collected market data into analysis insights via the Gemini
//! generateContent API. Runs without a credential by producing a structured
//! offline analysis instead, and falls back the same way on API failure.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::services::collector::MarketData;
use crate::services::report::title_case;

// == Constants ==
const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const PRIMARY_MODEL: &str = "gemini-1.5-flash";
const FALLBACK_MODEL: &str = "gemini-pro";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Snippets included in the prompt
const MAX_PROMPT_SNIPPETS: usize = 10;
/// Generated text shorter than this is treated as a failed generation
const MIN_INSIGHTS_LENGTH: usize = 100;

// == Analysis Result ==
/// Insights produced for one sector.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Sanitized sector the insights cover
    pub sector: String,
    /// Markdown insights body
    pub insights: String,
    /// Analysis timestamp
    pub analyzed_at: DateTime<Utc>,
}

// == Analyzer Trait ==
/// Synthesizes insights from collected market data.
#[async_trait]
pub trait MarketAnalyzer: Send + Sync {
    /// Analyzes `data` into insights. Never fails; implementations fall back
    /// to an offline analysis when generation is unavailable.
    async fn analyze(&self, data: &MarketData) -> AnalysisResult;
}

/// Internal generation failures; callers only ever see the fallback.
#[derive(Debug, Error)]
enum GenerateError {
    #[error("no model credential configured")]
    MissingApiKey,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("model endpoint returned status {0}")]
    Status(u16),
    #[error("generated text too short ({0} chars)")]
    TooShort(usize),
}

// == Gemini Analyzer ==
/// Analyzer backed by the Gemini REST API.
///
/// Tries the primary model first and retries once with the older fallback
/// model before giving up and producing the offline analysis.
pub struct GeminiAnalyzer {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl GeminiAnalyzer {
    /// Creates an analyzer; without a key every analysis is offline.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let key = self.api_key.as_deref().ok_or(GenerateError::MissingApiKey)?;

        match self.request_model(PRIMARY_MODEL, key, prompt).await {
            Ok(text) => Ok(text),
            Err(err) => {
                warn!(
                    error = %err,
                    model = PRIMARY_MODEL,
                    "primary model failed, retrying with fallback model"
                );
                self.request_model(FALLBACK_MODEL, key, prompt).await
            }
        }
    }

    async fn request_model(
        &self,
        model: &str,
        key: &str,
        prompt: &str,
    ) -> Result<String, GenerateError> {
        let url = format!("{}/{}:generateContent?key={}", GEMINI_ENDPOINT, model, key);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                top_p: 0.95,
                top_k: 40,
                max_output_tokens: 4096,
            },
        };

        let response = self
            .http
            .post(&url)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerateError::Status(response.status().as_u16()));
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = extract_text(parsed).trim().to_string();

        if text.len() < MIN_INSIGHTS_LENGTH {
            return Err(GenerateError::TooShort(text.len()));
        }
        Ok(text)
    }
}

#[async_trait]
impl MarketAnalyzer for GeminiAnalyzer {
    async fn analyze(&self, data: &MarketData) -> AnalysisResult {
        let prompt = build_prompt(data);

        let insights = match self.generate(&prompt).await {
            Ok(text) => {
                info!(sector = %data.sector, "model analysis generated");
                text
            }
            Err(GenerateError::MissingApiKey) => {
                warn!(sector = %data.sector, "no model credential configured, using offline analysis");
                fallback_insights(data)
            }
            Err(err) => {
                warn!(error = %err, sector = %data.sector, "model analysis failed, using offline analysis");
                fallback_insights(data)
            }
        };

        AnalysisResult {
            sector: data.sector.clone(),
            insights,
            analyzed_at: Utc::now(),
        }
    }
}

// == Prompt Construction ==
/// Builds the analysis prompt from at most `MAX_PROMPT_SNIPPETS` snippets.
fn build_prompt(data: &MarketData) -> String {
    let summary = data
        .snippets
        .iter()
        .take(MAX_PROMPT_SNIPPETS)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are an expert financial analyst specializing in Indian markets and trade \
         opportunities. Analyze the {} sector in India using the market data below and \
         produce a professional markdown report.\n\n\
         **Market Data:**\n{}\n\n\
         **Required sections:**\n\
         ## Market Overview\n\
         ## Key Market Trends\n\
         ## Trade Opportunities\n\
         ## Growth Drivers\n\
         ## Risks & Challenges\n\
         ## Investment Recommendations\n\n\
         Ground every claim in the data provided, keep an analytical tone, and begin \
         directly with the Market Overview section.",
        data.sector, summary
    )
}

// == Offline Fallback ==
/// Structured analysis produced when no model output is available.
fn fallback_insights(data: &MarketData) -> String {
    let title = title_case(&data.sector);
    format!(
        "## Market Overview\n\
         The {title} sector in India is drawing sustained attention from traders and \
         investors. Based on {count} collected data points, activity in the sector \
         reflects broader momentum in the Indian economy.\n\n\
         ## Key Market Trends\n\
         - Domestic demand continues to anchor sector growth\n\
         - Policy support and incentive schemes are active in this space\n\
         - Supply-chain modernization is changing how the sector operates\n\n\
         ## Trade Opportunities\n\
         - Export corridors into regional markets are widening\n\
         - Import substitution is opening room for domestic producers\n\
         - Partnerships with established distributors lower entry barriers\n\n\
         ## Growth Drivers\n\
         - Favorable demographics and rising consumption\n\
         - Government initiatives targeted at the {title} sector\n\
         - Increasing formalization and digital adoption\n\n\
         ## Risks & Challenges\n\
         - Regulatory changes can shift sector economics quickly\n\
         - Global demand cycles affect export-oriented segments\n\
         - Input cost volatility compresses margins\n\n\
         ## Investment Recommendations\n\
         Monitor quarterly sector indicators and policy announcements before \
         committing capital. Staggered entry and diversified exposure across the \
         {title} value chain reduce concentration risk. This offline analysis was \
         generated without model assistance; rerun once a model credential is \
         configured for a data-grounded report.",
        title = title,
        count = data.snippets.len()
    )
}

// == Wire Types ==
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

/// First candidate's first part, or empty when the response carries none.
fn extract_text(response: GenerateResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content.parts.into_iter().next())
        .map(|part| part.text)
        .unwrap_or_default()
}
