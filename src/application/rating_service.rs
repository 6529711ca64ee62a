use crate::application::ml::orchestrator::{DaySeriesOrchestrator, SeriesRequest};
use crate::domain::errors::{MarketDataError, RatingError};
use crate::domain::ml::feature_registry::{RawInputs, StaticFeatures};
use crate::domain::ports::{MacroDataProvider, MarketDataProvider, SentimentLookup};
use crate::domain::rating::PredictionResult;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

const MAX_SYMBOL_LEN: usize = 12;

/// Rejects anything that cannot be a ticker before any upstream call is made.
pub fn validate_symbol(symbol: &str) -> Result<String, MarketDataError> {
    let trimmed = symbol.trim();
    let valid = !trimmed.is_empty()
        && trimmed.len() <= MAX_SYMBOL_LEN
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));
    if !valid {
        return Err(MarketDataError::InvalidSymbol {
            symbol: symbol.to_string(),
        });
    }
    Ok(trimmed.to_uppercase())
}

/// Per-request composition: fetch everything for one symbol, then run the
/// day series. Collaborator failures are fatal and never retried here.
pub struct RatingService {
    market_data: Arc<dyn MarketDataProvider>,
    macro_data: Arc<dyn MacroDataProvider>,
    sentiment: Arc<dyn SentimentLookup>,
    orchestrator: DaySeriesOrchestrator,
}

impl RatingService {
    pub fn new(
        market_data: Arc<dyn MarketDataProvider>,
        macro_data: Arc<dyn MacroDataProvider>,
        sentiment: Arc<dyn SentimentLookup>,
        orchestrator: DaySeriesOrchestrator,
    ) -> Self {
        Self {
            market_data,
            macro_data,
            sentiment,
            orchestrator,
        }
    }

    pub async fn predict(&self, symbol: &str) -> Result<PredictionResult, RatingError> {
        self.predict_as_of(symbol, Utc::now().date_naive()).await
    }

    pub async fn predict_as_of(
        &self,
        symbol: &str,
        as_of: NaiveDate,
    ) -> Result<PredictionResult, RatingError> {
        let symbol = validate_symbol(symbol)?;
        info!(
            "RatingService: predicting {} over {} days ending {}",
            symbol,
            self.orchestrator.lookback_days(),
            as_of
        );

        let sentiment = self.sentiment.sentiment_for(&symbol);
        let fundamentals = self.market_data.fetch_fundamentals(&symbol).await?;
        let prices = self.market_data.fetch_price_history(&symbol).await?;
        let macro_data = self.macro_data.fetch_macro().await?;

        let static_features = StaticFeatures::from_inputs(&RawInputs::from_sources(
            &fundamentals,
            &macro_data,
            sentiment,
        ));

        let result = self.orchestrator.run(&SeriesRequest {
            symbol: &symbol,
            static_features,
            prices: &prices,
            as_of,
        })?;

        if let Some(latest) = result.latest() {
            info!(
                "RatingService: {} latest rating {} on {} (confidence {:?})",
                symbol, latest.predicted_rating, latest.date, latest.confidence
            );
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_symbol() {
        assert_eq!(validate_symbol(" aapl ").unwrap(), "AAPL");
        assert_eq!(validate_symbol("BRK-B").unwrap(), "BRK-B");
        assert_eq!(validate_symbol("^GSPC").unwrap(), "^GSPC");
        assert!(validate_symbol("").is_err());
        assert!(validate_symbol("AAPL;DROP").is_err());
        assert!(validate_symbol("ABCDEFGHIJKLM").is_err());
    }
}
