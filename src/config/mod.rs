//! Configuration module for credrate.
//!
//! Structured configuration loading from environment variables, organized by
//! concern: model artifacts, upstream providers and the prediction window.

mod artifact_config;
mod prediction_config;
mod provider_config;

pub use artifact_config::ArtifactEnvConfig;
pub use prediction_config::{MAX_LOOKBACK_DAYS, PredictionEnvConfig};
pub use provider_config::ProviderEnvConfig;

use anyhow::{Context, Result};

/// Main application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub artifacts: ArtifactEnvConfig,
    pub providers: ProviderEnvConfig,
    pub prediction: PredictionEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self> {
        let artifacts = ArtifactEnvConfig::from_env();
        let providers = ProviderEnvConfig::from_env().context("Failed to load provider config")?;
        let prediction =
            PredictionEnvConfig::from_env().context("Failed to load prediction config")?;

        Ok(Self {
            artifacts,
            providers,
            prediction,
        })
    }
}
