//! Prediction window and ranking configuration.

use anyhow::{Context, Result};
use std::env;

/// Upper bound on the window; ten years of calendar days.
pub const MAX_LOOKBACK_DAYS: u32 = 3_650;

/// Prediction environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionEnvConfig {
    pub lookback_days: u32,
    pub top_contributions: usize,
}

impl Default for PredictionEnvConfig {
    fn default() -> Self {
        Self {
            lookback_days: 30,
            top_contributions: 3,
        }
    }
}

impl PredictionEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            lookback_days: Self::parse_u32("LOOKBACK_DAYS", defaults.lookback_days)?,
            top_contributions: Self::parse_usize("TOP_CONTRIBUTIONS", defaults.top_contributions)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// The window must be within `1..=MAX_LOOKBACK_DAYS`; the ranking cut-off at least one.
    pub fn validate(&self) -> Result<()> {
        if self.lookback_days == 0 || self.lookback_days > MAX_LOOKBACK_DAYS {
            anyhow::bail!(
                "LOOKBACK_DAYS must be between 1 and {}, got {}",
                MAX_LOOKBACK_DAYS,
                self.lookback_days
            );
        }
        if self.top_contributions == 0 {
            anyhow::bail!("TOP_CONTRIBUTIONS must be at least 1");
        }
        Ok(())
    }

    fn parse_u32(key: &str, default: u32) -> Result<u32> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<u32>()
            .context(format!("Failed to parse {}", key))
    }

    fn parse_usize(key: &str, default: usize) -> Result<usize> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<usize>()
            .context(format!("Failed to parse {}", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_config_defaults() {
        let config = PredictionEnvConfig::default();
        assert_eq!(config.lookback_days, 30);
        assert_eq!(config.top_contributions, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_values_rejected() {
        let config = PredictionEnvConfig {
            lookback_days: 0,
            top_contributions: 3,
        };
        assert!(config.validate().is_err());

        let config = PredictionEnvConfig {
            lookback_days: 5,
            top_contributions: 0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_lookback_rejected() {
        let config = PredictionEnvConfig {
            lookback_days: 100_000_000,
            top_contributions: 3,
        };
        assert!(config.validate().is_err());

        let config = PredictionEnvConfig {
            lookback_days: MAX_LOOKBACK_DAYS,
            top_contributions: 3,
        };
        assert!(config.validate().is_ok());
    }
}
