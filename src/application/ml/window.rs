use crate::application::market_data::statistical_features::{price_momentum, realized_volatility};
use crate::domain::market::price_series::PriceSeries;
use chrono::{Duration, NaiveDate};

/// Minimum observations as of a day for that day to be emitted.
pub const MIN_OBSERVATIONS: usize = 2;

/// Day-varying statistics reconstructed as of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub date: NaiveDate,
    pub observations: usize,
    pub volatility: Option<f64>,
    pub momentum: Option<f64>,
}

/// Rebuilds the volatility/momentum history of the last `lookback_days`
/// calendar days from a single price history pull.
#[derive(Debug, Clone, Copy)]
pub struct WindowReconstructor {
    lookback_days: u32,
}

impl WindowReconstructor {
    pub fn new(lookback_days: u32) -> Self {
        Self { lookback_days }
    }

    pub fn lookback_days(&self) -> u32 {
        self.lookback_days
    }

    /// Calendar days `[today - N, today - 1]`, oldest first. Days before the
    /// earliest representable date are dropped.
    pub fn days(&self, today: NaiveDate) -> impl Iterator<Item = NaiveDate> {
        (1..=i64::from(self.lookback_days))
            .rev()
            .filter_map(move |offset| today.checked_sub_signed(Duration::days(offset)))
    }

    /// Statistics for every day in the window whose sub-series holds at
    /// least [`MIN_OBSERVATIONS`] closes. Other days are skipped, not errors:
    /// weekends and holidays simply reuse the last trading close.
    pub fn reconstruct(&self, series: &PriceSeries, today: NaiveDate) -> Vec<WindowStats> {
        self.days(today)
            .filter_map(|day| Self::stats_as_of(series, day))
            .collect()
    }

    fn stats_as_of(series: &PriceSeries, day: NaiveDate) -> Option<WindowStats> {
        let sub_series = series.as_of(day);
        if sub_series.len() < MIN_OBSERVATIONS {
            return None;
        }

        let closes: Vec<f64> = sub_series.iter().map(|p| p.close).collect();
        Some(WindowStats {
            date: day,
            observations: closes.len(),
            volatility: realized_volatility(&closes),
            momentum: price_momentum(&closes),
        })
    }
}

impl Default for WindowReconstructor {
    fn default() -> Self {
        Self::new(30)
    }
}
