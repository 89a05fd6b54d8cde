//! Services Module
//!
//! External collaborators for the analysis pipeline: web data collection,
//! model-backed insight generation, and report rendering. Each collaborator
//! degrades to a deterministic fallback instead of erroring, so the HTTP
//! layer never sees an upstream failure.

pub mod analyzer;
pub mod collector;
pub mod report;

// Re-export public types
pub use analyzer::{AnalysisResult, GeminiAnalyzer, MarketAnalyzer};
pub use collector::{MarketData, MarketDataCollector, WebSearchCollector};
pub use report::render_report;
