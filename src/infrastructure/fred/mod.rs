//! FRED (Federal Reserve Economic Data) macro indicators.

use crate::domain::errors::MarketDataError;
use crate::domain::market::fundamentals::MacroSnapshot;
use crate::domain::ports::MacroDataProvider;
use crate::infrastructure::core::http_client_factory::HttpClientFactory;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

const SOURCE: &str = "FRED";

pub const GDP_SERIES: &str = "GDP";
pub const INTEREST_RATE_SERIES: &str = "FEDFUNDS";
pub const CPI_SERIES: &str = "CPIAUCSL";

/// Monthly observations needed for a 12-month-ago comparison.
pub const MIN_CPI_OBSERVATIONS: usize = 13;

#[derive(Debug, Deserialize)]
pub struct ObservationsResponse {
    #[serde(default)]
    pub observations: Vec<Observation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Observation {
    pub date: String,
    /// Numeric string, or "." when FRED has no value for the period.
    pub value: String,
}

impl Observation {
    pub fn parsed(&self) -> Option<f64> {
        self.value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

/// Most recent value of a series; undefined when the series is empty or the
/// last period is "."
pub fn latest_value(observations: &[Observation]) -> Option<f64> {
    observations.last().and_then(Observation::parsed)
}

/// Year-over-year CPI change in percent.
pub fn yoy_inflation(observations: &[Observation]) -> Option<f64> {
    if observations.len() < MIN_CPI_OBSERVATIONS {
        return None;
    }
    let latest = observations[observations.len() - 1].parsed()?;
    let year_ago = observations[observations.len() - MIN_CPI_OBSERVATIONS].parsed()?;
    if year_ago == 0.0 {
        return None;
    }
    Some((latest - year_ago) / year_ago * 100.0)
}

pub struct FredMacroProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl FredMacroProvider {
    pub fn new(base_url: String, api_key: String, timeout_secs: u64) -> Self {
        Self {
            client: HttpClientFactory::create_client(timeout_secs),
            base_url,
            api_key,
        }
    }

    async fn fetch_series(&self, series_id: &str) -> Result<Vec<Observation>, MarketDataError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("series_id", series_id),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
            ])
            .send()
            .await
            .map_err(|e| upstream(format!("request for {} failed: {}", series_id, e)))?;

        if !response.status().is_success() {
            return Err(upstream(format!(
                "series {} returned status {}",
                series_id,
                response.status()
            )));
        }

        let body: ObservationsResponse = response
            .json()
            .await
            .map_err(|e| upstream(format!("failed to parse series {}: {}", series_id, e)))?;

        debug!("FRED {}: {} observations", series_id, body.observations.len());
        Ok(body.observations)
    }
}

fn upstream(reason: String) -> MarketDataError {
    MarketDataError::Upstream {
        source_name: SOURCE.to_string(),
        reason,
    }
}

#[async_trait]
impl MacroDataProvider for FredMacroProvider {
    async fn fetch_macro(&self) -> Result<MacroSnapshot, MarketDataError> {
        let gdp = latest_value(&self.fetch_series(GDP_SERIES).await?);
        let interest_rate = latest_value(&self.fetch_series(INTEREST_RATE_SERIES).await?);
        let inflation = yoy_inflation(&self.fetch_series(CPI_SERIES).await?);

        info!(
            "FRED macro snapshot: GDP={:?} rate={:?} inflation={:?}",
            gdp, interest_rate, inflation
        );
        Ok(MacroSnapshot {
            gdp,
            interest_rate,
            inflation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(values: &[&str]) -> Vec<Observation> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Observation {
                date: format!("2024-{:02}-01", (i % 12) + 1),
                value: v.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_latest_value() {
        assert_eq!(latest_value(&obs(&["4.5", "4.33"])), Some(4.33));
        assert_eq!(latest_value(&obs(&["4.5", "."])), None);
        assert_eq!(latest_value(&[]), None);
    }

    #[test]
    fn test_yoy_inflation_uses_thirteenth_from_last() {
        let mut values = vec!["100.0"; 13];
        values[0] = "300.0";
        values[12] = "309.0";
        let inflation = yoy_inflation(&obs(&values)).unwrap();
        assert!((inflation - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_yoy_inflation_needs_thirteen_observations() {
        assert_eq!(yoy_inflation(&obs(&vec!["100.0"; 12])), None);
    }

    #[test]
    fn test_yoy_inflation_missing_value() {
        let mut values = vec!["100.0"; 14];
        values[13] = ".";
        assert_eq!(yoy_inflation(&obs(&values)), None);
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{"realtime_start":"2025-06-01","observations":[
            {"realtime_start":"2025-06-01","realtime_end":"2025-06-01","date":"2025-01-01","value":"29723.864"}
        ]}"#;
        let response: ObservationsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(latest_value(&response.observations), Some(29723.864));
        assert_eq!(response.observations[0].date, "2025-01-01");
    }
}
