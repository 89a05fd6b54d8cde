//! Configuration Module
//!
//! Handles loading and managing runtime configuration from environment variables.

use std::env;

/// Runtime configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Maximum accepted requests per identifier per rolling hour
    pub rate_limit_per_hour: u32,
    /// Default TTL in seconds for cached analysis reports
    pub cache_ttl_seconds: u64,
    /// Background maintenance sweep interval in seconds
    pub sweep_interval_seconds: u64,
    /// Gemini API key; analysis falls back to offline reports when absent
    pub gemini_api_key: Option<String>,
    /// Static API key allow-list; empty list disables authentication
    pub api_keys: Vec<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    /// - `RATE_LIMIT_PER_HOUR` - Hourly request ceiling per client (default: 10)
    /// - `CACHE_TTL_SECONDS` - Report cache TTL in seconds (default: 3600)
    /// - `SWEEP_INTERVAL_SECONDS` - Maintenance sweep frequency (default: 300)
    /// - `GEMINI_API_KEY` - Generative model credential (optional)
    /// - `API_KEYS` - Comma-separated client API keys; unset disables auth
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            rate_limit_per_hour: env::var("RATE_LIMIT_PER_HOUR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            cache_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            sweep_interval_seconds: env::var("SWEEP_INTERVAL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            gemini_api_key: env::var("GEMINI_API_KEY")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            api_keys: env::var("API_KEYS")
                .ok()
                .map(|v| parse_api_keys(&v))
                .unwrap_or_default(),
        }
    }

    /// Returns true when an API key allow-list is configured.
    pub fn auth_enabled(&self) -> bool {
        !self.api_keys.is_empty()
    }

    /// Checks a presented API key against the allow-list.
    pub fn is_valid_api_key(&self, key: &str) -> bool {
        self.api_keys.iter().any(|k| k == key)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8000,
            rate_limit_per_hour: 10,
            cache_ttl_seconds: 3600,
            sweep_interval_seconds: 300,
            gemini_api_key: None,
            api_keys: Vec::new(),
        }
    }
}

/// Splits a comma-separated key list, dropping empty segments.
fn parse_api_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}
