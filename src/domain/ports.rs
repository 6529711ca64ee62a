use crate::domain::errors::MarketDataError;
use crate::domain::market::fundamentals::{FundamentalsSnapshot, MacroSnapshot};
use crate::domain::market::price_series::PriceSeries;
use async_trait::async_trait;

// Need async_trait for async functions in traits
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fetch_fundamentals(&self, symbol: &str) -> Result<FundamentalsSnapshot, MarketDataError>;

    /// Daily closes for the provider's trailing history window, oldest first.
    async fn fetch_price_history(&self, symbol: &str) -> Result<PriceSeries, MarketDataError>;
}

#[async_trait]
pub trait MacroDataProvider: Send + Sync {
    async fn fetch_macro(&self) -> Result<MacroSnapshot, MarketDataError>;
}

/// News-sentiment proxy per symbol. Loaded once; lookups never fail.
pub trait SentimentLookup: Send + Sync {
    /// Sentiment of the latest record for the symbol: 0.0 when there is no
    /// record, `None` when the latest record carries no score.
    fn sentiment_for(&self, symbol: &str) -> Option<f64>;
}
