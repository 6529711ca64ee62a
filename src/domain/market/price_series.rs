use crate::domain::errors::MarketDataError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Daily closes ordered by date, oldest first.
///
/// Duplicate dates are kept as delivered; only out-of-order input is rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: &str, points: Vec<PricePoint>) -> Result<Self, MarketDataError> {
        if let Some(pair) = points.windows(2).find(|w| w[1].date < w[0].date) {
            return Err(MarketDataError::InvalidData {
                symbol: symbol.to_string(),
                reason: format!(
                    "price history out of order: {} follows {}",
                    pair[1].date, pair[0].date
                ),
            });
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Every observation dated on or before `day`.
    pub fn as_of(&self, day: NaiveDate) -> &[PricePoint] {
        let end = self.points.partition_point(|p| p.date <= day);
        &self.points[..end]
    }
}
