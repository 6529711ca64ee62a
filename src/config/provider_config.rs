//! Upstream data provider configuration parsing from environment variables.

use anyhow::{Context, Result};
use std::env;

/// Provider environment configuration
#[derive(Debug, Clone)]
pub struct ProviderEnvConfig {
    pub fred_api_key: String,
    pub fred_base_url: String,
    pub yahoo_base_url: String,
    pub price_history_range: String,
    pub http_timeout_secs: u64,
}

impl Default for ProviderEnvConfig {
    fn default() -> Self {
        Self {
            fred_api_key: String::new(),
            fred_base_url: "https://api.stlouisfed.org/fred/series/observations".to_string(),
            yahoo_base_url: "https://query1.finance.yahoo.com".to_string(),
            price_history_range: "6mo".to_string(),
            http_timeout_secs: 30,
        }
    }
}

impl ProviderEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let http_timeout_secs = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context(format!("Failed to parse HTTP_TIMEOUT_SECS: {}", raw))?,
            Err(_) => defaults.http_timeout_secs,
        };

        Ok(Self {
            fred_api_key: env::var("FRED_API_KEY").unwrap_or_default(),
            fred_base_url: env::var("FRED_BASE_URL").unwrap_or(defaults.fred_base_url),
            yahoo_base_url: env::var("YAHOO_BASE_URL").unwrap_or(defaults.yahoo_base_url),
            price_history_range: env::var("PRICE_HISTORY_RANGE")
                .unwrap_or(defaults.price_history_range),
            http_timeout_secs,
        })
    }
}
