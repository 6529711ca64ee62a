use super::common::{ChartEnvelope, QuoteSummaryEnvelope, raw};
use crate::domain::errors::MarketDataError;
use crate::domain::market::fundamentals::FundamentalsSnapshot;
use crate::domain::market::price_series::{PricePoint, PriceSeries};
use crate::domain::ports::MarketDataProvider;
use crate::infrastructure::core::http_client_factory::HttpClientFactory;
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

const SOURCE: &str = "Yahoo Finance";

pub struct YahooMarketDataProvider {
    client: Client,
    base_url: String,
    history_range: String,
}

impl YahooMarketDataProvider {
    pub fn new(base_url: String, history_range: String, timeout_secs: u64) -> Self {
        Self {
            client: HttpClientFactory::create_client(timeout_secs),
            base_url: base_url.trim_end_matches('/').to_string(),
            history_range,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        symbol: &str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, MarketDataError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| upstream(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(MarketDataError::InvalidSymbol {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(upstream(format!("{} returned {}: {}", url, status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| upstream(format!("failed to parse response from {}: {}", url, e)))
    }
}

fn upstream(reason: String) -> MarketDataError {
    MarketDataError::Upstream {
        source_name: SOURCE.to_string(),
        reason,
    }
}

/// Converts a chart response into a daily close series.
///
/// Timestamps are shifted by the exchange offset so each bar lands on its
/// local trading date. Bars with a null close are dropped; timestamp and
/// close arrays of different lengths are rejected.
pub fn parse_chart(symbol: &str, envelope: ChartEnvelope) -> Result<PriceSeries, MarketDataError> {
    if let Some(error) = envelope.chart.error {
        debug!("Yahoo chart error for {}: {}", symbol, error.describe());
        return Err(MarketDataError::InvalidSymbol {
            symbol: symbol.to_string(),
        });
    }

    let result = envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| MarketDataError::InvalidSymbol {
            symbol: symbol.to_string(),
        })?;

    let offset = result.meta.gmtoffset;
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    if closes.len() != result.timestamp.len() {
        return Err(MarketDataError::InvalidData {
            symbol: symbol.to_string(),
            reason: format!(
                "chart has {} timestamps but {} closes",
                result.timestamp.len(),
                closes.len()
            ),
        });
    }

    let points = result
        .timestamp
        .iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let close = close.filter(|c| c.is_finite())?;
            let date = DateTime::from_timestamp(ts + offset, 0)?.date_naive();
            Some(PricePoint::new(date, close))
        })
        .collect();

    PriceSeries::new(symbol, points)
}

/// Pulls the ratio snapshot and the most recent balance-sheet statement.
pub fn parse_quote_summary(
    symbol: &str,
    envelope: QuoteSummaryEnvelope,
) -> Result<FundamentalsSnapshot, MarketDataError> {
    if let Some(error) = envelope.quote_summary.error {
        debug!("Yahoo quoteSummary error for {}: {}", symbol, error.describe());
        return Err(MarketDataError::InvalidSymbol {
            symbol: symbol.to_string(),
        });
    }

    let result = envelope
        .quote_summary
        .result
        .and_then(|results| results.into_iter().next())
        .unwrap_or_default();

    let financial = &result.financial_data;
    let statement = result
        .balance_sheet_history
        .balance_sheet_statements
        .first();

    Ok(FundamentalsSnapshot {
        current_ratio: raw(financial.current_ratio),
        quick_ratio: raw(financial.quick_ratio),
        cash: statement.and_then(|s| raw(s.cash)),
        current_liabilities: statement.and_then(|s| raw(s.total_current_liabilities)),
        total_assets: statement.and_then(|s| raw(s.total_assets)),
        total_liabilities: statement.and_then(|s| raw(s.total_liab)),
        debt_to_equity: raw(financial.debt_to_equity),
    })
}

#[async_trait]
impl MarketDataProvider for YahooMarketDataProvider {
    async fn fetch_fundamentals(&self, symbol: &str) -> Result<FundamentalsSnapshot, MarketDataError> {
        let url = format!("{}/v10/finance/quoteSummary/{}", self.base_url, symbol);
        let envelope: QuoteSummaryEnvelope = self
            .get_json(
                symbol,
                &url,
                &[("modules", "financialData,balanceSheetHistory")],
            )
            .await?;
        let snapshot = parse_quote_summary(symbol, envelope)?;
        debug!("Yahoo fundamentals for {}: {:?}", symbol, snapshot);
        Ok(snapshot)
    }

    async fn fetch_price_history(&self, symbol: &str) -> Result<PriceSeries, MarketDataError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let envelope: ChartEnvelope = self
            .get_json(
                symbol,
                &url,
                &[("range", self.history_range.as_str()), ("interval", "1d")],
            )
            .await?;
        let series = parse_chart(symbol, envelope)?;
        info!(
            "Yahoo: {} daily closes for {} ({:?} .. {:?})",
            series.len(),
            symbol,
            series.first_date(),
            series.last_date()
        );
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_chart_shifts_to_exchange_date_and_drops_nulls() {
        // 2025-03-03 14:30 UTC and 2025-03-04 14:30 UTC, New York offset -5h
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {"gmtoffset": -18000, "symbol": "AAPL", "currency": "USD"},
                    "timestamp": [1741012200, 1741098600, 1741185000],
                    "indicators": {"quote": [{"close": [241.84, null, 235.74]}]}
                }],
                "error": null
            }
        }"#;
        let envelope: ChartEnvelope = serde_json::from_str(body).unwrap();
        let series = parse_chart("AAPL", envelope).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[0].date, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
        assert_eq!(series.points()[1].date, NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
        assert_eq!(series.points()[1].close, 235.74);
    }

    #[test]
    fn test_parse_chart_rejects_misaligned_arrays() {
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {"gmtoffset": 0},
                    "timestamp": [1741012200, 1741098600, 1741185000],
                    "indicators": {"quote": [{"close": [241.84, 235.74]}]}
                }],
                "error": null
            }
        }"#;
        let envelope: ChartEnvelope = serde_json::from_str(body).unwrap();
        match parse_chart("AAPL", envelope) {
            Err(MarketDataError::InvalidData { symbol, reason }) => {
                assert_eq!(symbol, "AAPL");
                assert!(reason.contains("3 timestamps"));
            }
            other => panic!("expected InvalidData, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_chart_error_is_invalid_symbol() {
        let body = r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#;
        let envelope: ChartEnvelope = serde_json::from_str(body).unwrap();
        assert!(matches!(
            parse_chart("NOPE", envelope),
            Err(MarketDataError::InvalidSymbol { .. })
        ));
    }

    #[test]
    fn test_parse_quote_summary() {
        let body = r#"{
            "quoteSummary": {
                "result": [{
                    "financialData": {
                        "currentRatio": {"raw": 0.867, "fmt": "0.87"},
                        "quickRatio": {},
                        "debtToEquity": {"raw": 145.0, "fmt": "145.00"}
                    },
                    "balanceSheetHistory": {
                        "balanceSheetStatements": [
                            {"cash": {"raw": 29943.0}, "totalCurrentLiabilities": {"raw": 176392.0},
                             "totalAssets": {"raw": 364980.0}},
                            {"cash": {"raw": 1.0}, "totalLiab": {"raw": 2.0}}
                        ]
                    }
                }],
                "error": null
            }
        }"#;
        let envelope: QuoteSummaryEnvelope = serde_json::from_str(body).unwrap();
        let snapshot = parse_quote_summary("AAPL", envelope).unwrap();

        assert_eq!(snapshot.current_ratio, Some(0.867));
        assert_eq!(snapshot.quick_ratio, None);
        assert_eq!(snapshot.debt_to_equity, Some(145.0));
        assert_eq!(snapshot.cash, Some(29943.0));
        assert_eq!(snapshot.current_liabilities, Some(176392.0));
        assert_eq!(snapshot.total_assets, Some(364980.0));
        // Only the most recent statement is used
        assert_eq!(snapshot.total_liabilities, None);
    }

    #[test]
    fn test_parse_quote_summary_without_modules() {
        let body = r#"{"quoteSummary": {"result": [{}], "error": null}}"#;
        let envelope: QuoteSummaryEnvelope = serde_json::from_str(body).unwrap();
        let snapshot = parse_quote_summary("XYZ", envelope).unwrap();
        assert_eq!(snapshot, FundamentalsSnapshot::default());
    }
}
