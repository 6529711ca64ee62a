use crate::domain::market::fundamentals::{FundamentalsSnapshot, MacroSnapshot};
use serde::Serialize;

pub const FEATURE_COUNT: usize = 11;

/// Ordered list of feature names.
/// This order MUST match exactly with the order the scaler, classifier and
/// explainer were fitted on. Any change here is a breaking change for every
/// artifact in the model directory.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "currentRatio",
    "quickRatio",
    "cashRatio",
    "debtRatio",
    "debtEquityRatio",
    "GDP",
    "interestRate",
    "inflation",
    "volatility",
    "momentum",
    "sentiment",
];

pub const VOLATILITY_SLOT: usize = 8;
pub const MOMENTUM_SLOT: usize = 9;

/// Position of a feature in the schema, if it exists.
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_NAMES.iter().position(|n| *n == name)
}

/// Maps NaN to undefined. Infinities are kept; the report boundary handles them.
pub fn defined(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

/// `numerator / denominator`, undefined when either side is missing or the
/// denominator is zero. Never panics.
pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let num = defined(numerator)?;
    let den = defined(denominator)?;
    if den == 0.0 {
        return None;
    }
    defined(Some(num / den))
}

/// Raw, un-derived inputs for one feature vector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInputs {
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub cash: Option<f64>,
    pub current_liabilities: Option<f64>,
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub gdp: Option<f64>,
    pub interest_rate: Option<f64>,
    pub inflation: Option<f64>,
    pub volatility: Option<f64>,
    pub momentum: Option<f64>,
    pub sentiment: Option<f64>,
}

impl RawInputs {
    /// Inputs from the collaborator snapshots, without day-varying statistics.
    pub fn from_sources(
        fundamentals: &FundamentalsSnapshot,
        macro_data: &MacroSnapshot,
        sentiment: Option<f64>,
    ) -> Self {
        Self {
            current_ratio: fundamentals.current_ratio,
            quick_ratio: fundamentals.quick_ratio,
            cash: fundamentals.cash,
            current_liabilities: fundamentals.current_liabilities,
            total_assets: fundamentals.total_assets,
            total_liabilities: fundamentals.total_liabilities,
            debt_to_equity: fundamentals.debt_to_equity,
            gdp: macro_data.gdp,
            interest_rate: macro_data.interest_rate,
            inflation: macro_data.inflation,
            volatility: None,
            momentum: None,
            sentiment,
        }
    }
}

/// Feature slots that do not change across the days of one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticFeatures {
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub cash_ratio: Option<f64>,
    pub debt_ratio: Option<f64>,
    pub debt_equity_ratio: Option<f64>,
    pub gdp: Option<f64>,
    pub interest_rate: Option<f64>,
    pub inflation: Option<f64>,
    pub sentiment: Option<f64>,
}

impl StaticFeatures {
    pub fn from_inputs(raw: &RawInputs) -> Self {
        Self {
            current_ratio: defined(raw.current_ratio),
            quick_ratio: defined(raw.quick_ratio),
            cash_ratio: ratio(raw.cash, raw.current_liabilities),
            debt_ratio: ratio(raw.total_liabilities, raw.total_assets),
            debt_equity_ratio: defined(raw.debt_to_equity),
            gdp: defined(raw.gdp),
            interest_rate: defined(raw.interest_rate),
            inflation: defined(raw.inflation),
            sentiment: defined(raw.sentiment),
        }
    }
}

/// Fixed-order 11-slot feature vector. `None` is an undefined slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [Option<f64>; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn build(raw: &RawInputs) -> Self {
        Self::from_parts(&StaticFeatures::from_inputs(raw), raw.volatility, raw.momentum)
    }

    /// Combines the shared static slots with one day's window statistics.
    pub fn from_parts(
        statics: &StaticFeatures,
        volatility: Option<f64>,
        momentum: Option<f64>,
    ) -> Self {
        Self {
            values: [
                statics.current_ratio,
                statics.quick_ratio,
                statics.cash_ratio,
                statics.debt_ratio,
                statics.debt_equity_ratio,
                statics.gdp,
                statics.interest_rate,
                statics.inflation,
                defined(volatility),
                defined(momentum),
                statics.sentiment,
            ],
        }
    }

    pub fn as_slice(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        feature_index(name).and_then(|i| self.values[i])
    }

    pub fn volatility(&self) -> Option<f64> {
        self.values[VOLATILITY_SLOT]
    }

    pub fn momentum(&self) -> Option<f64> {
        self.values[MOMENTUM_SLOT]
    }

    /// Pairs each slot with its schema name, in schema order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, Option<f64>)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }
}
