//! Return-based statistics over a daily close series
//!
//! This module provides calculations for:
//! - Day-over-day percentage returns
//! - Realized volatility (sample standard deviation of returns)
//! - Price momentum over the whole series

use statrs::statistics::{Data, Distribution};

/// Day-over-day percentage returns, `close[i] / close[i-1] - 1`.
///
/// A zero previous close yields a non-finite return rather than being dropped,
/// so downstream statistics become undefined instead of silently biased.
pub fn pct_returns(closes: &[f64]) -> Vec<f64> {
    closes.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
}

/// Sample standard deviation (n - 1) of the percentage returns.
///
/// # Returns
/// * `Some(f64)` - Volatility of the series
/// * `None` - Fewer than 2 returns, or a non-finite return in the series
pub fn realized_volatility(closes: &[f64]) -> Option<f64> {
    let returns = pct_returns(closes);
    if returns.len() < 2 {
        return None;
    }

    // statrs works on the f64 boundary
    let data = Data::new(returns);
    data.std_dev().filter(|v| v.is_finite())
}

/// Relative change from the first to the last close.
///
/// # Returns
/// * `Some(f64)` - `(last - first) / first`
/// * `None` - Empty series or a zero first close
pub fn price_momentum(closes: &[f64]) -> Option<f64> {
    let first = *closes.first()?;
    let last = *closes.last()?;
    let momentum = (last - first) / first;
    momentum.is_finite().then_some(momentum)
}
