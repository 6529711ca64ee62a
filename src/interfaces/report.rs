//! JSON report handed to the result consumer.
//!
//! Every float leaves through [`finite`], so NaN, infinities and undefined
//! slots all serialize as `null`.

use crate::domain::ml::feature_registry::StaticFeatures;
use crate::domain::rating::{DayRecord, FeatureContribution, PredictionResult};
use chrono::NaiveDate;
use serde::Serialize;

/// Undefined or non-finite values become `None`.
pub fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributionReport {
    pub feature: String,
    pub contribution: Option<f64>,
}

impl From<&FeatureContribution> for ContributionReport {
    fn from(c: &FeatureContribution) -> Self {
        Self {
            feature: c.feature.to_string(),
            contribution: finite(c.contribution),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayReport {
    pub date: NaiveDate,
    pub predicted_rating: i64,
    pub confidence: Option<f64>,
    pub volatility: Option<f64>,
    pub momentum: Option<f64>,
    pub top_features: Vec<ContributionReport>,
    pub top_three: Vec<ContributionReport>,
}

impl From<&DayRecord> for DayReport {
    fn from(day: &DayRecord) -> Self {
        Self {
            date: day.date,
            predicted_rating: day.predicted_rating,
            confidence: finite(day.confidence),
            volatility: finite(day.volatility),
            momentum: finite(day.momentum),
            top_features: day.ranked_contributions.iter().map(Into::into).collect(),
            top_three: day.top_contributions().iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturesReport {
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub cash_ratio: Option<f64>,
    pub debt_ratio: Option<f64>,
    pub debt_equity_ratio: Option<f64>,
    #[serde(rename = "GDP")]
    pub gdp: Option<f64>,
    pub interest_rate: Option<f64>,
    pub inflation: Option<f64>,
    pub sentiment: Option<f64>,
}

impl From<&StaticFeatures> for FeaturesReport {
    fn from(f: &StaticFeatures) -> Self {
        Self {
            current_ratio: finite(f.current_ratio),
            quick_ratio: finite(f.quick_ratio),
            cash_ratio: finite(f.cash_ratio),
            debt_ratio: finite(f.debt_ratio),
            debt_equity_ratio: finite(f.debt_equity_ratio),
            gdp: finite(f.gdp),
            interest_rate: finite(f.interest_rate),
            inflation: finite(f.inflation),
            sentiment: finite(f.sentiment),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionReport {
    pub symbol: String,
    pub as_of: NaiveDate,
    pub history: Vec<DayReport>,
    pub features: FeaturesReport,
}

impl From<&PredictionResult> for PredictionReport {
    fn from(result: &PredictionResult) -> Self {
        Self {
            symbol: result.symbol.clone(),
            as_of: result.as_of,
            history: result.history.iter().map(Into::into).collect(),
            features: (&result.static_features).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(contributions: Vec<FeatureContribution>, top_k: usize) -> DayRecord {
        DayRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            predicted_rating: 7,
            class_index: 2,
            confidence: Some(f64::NAN),
            volatility: Some(f64::INFINITY),
            momentum: Some(0.25),
            ranked_contributions: contributions,
            top_k,
        }
    }

    #[test]
    fn test_finite_filters_non_finite() {
        assert_eq!(finite(Some(1.5)), Some(1.5));
        assert_eq!(finite(Some(f64::NAN)), None);
        assert_eq!(finite(Some(f64::NEG_INFINITY)), None);
        assert_eq!(finite(None), None);
    }

    #[test]
    fn test_report_shape_and_nulls() {
        let contributions = vec![
            FeatureContribution { feature: "momentum", contribution: Some(-0.9) },
            FeatureContribution { feature: "GDP", contribution: Some(0.4) },
            FeatureContribution { feature: "inflation", contribution: Some(0.1) },
            FeatureContribution { feature: "sentiment", contribution: None },
        ];
        let result = PredictionResult {
            symbol: "AAPL".to_string(),
            as_of: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            history: vec![day(contributions, 3)],
            static_features: StaticFeatures {
                cash_ratio: Some(f64::INFINITY),
                gdp: Some(27000.0),
                ..StaticFeatures::default()
            },
        };

        let json = serde_json::to_value(PredictionReport::from(&result)).unwrap();
        assert_eq!(json["symbol"], "AAPL");
        assert_eq!(json["asOf"], "2024-03-05");

        let first = &json["history"][0];
        assert_eq!(first["date"], "2024-03-04");
        assert_eq!(first["predictedRating"], 7);
        assert!(first["confidence"].is_null());
        assert!(first["volatility"].is_null());
        assert_eq!(first["momentum"], 0.25);
        assert_eq!(first["topFeatures"].as_array().unwrap().len(), 4);
        assert_eq!(first["topThree"].as_array().unwrap().len(), 3);
        assert_eq!(first["topThree"][0]["feature"], "momentum");
        assert!(first["topFeatures"][3]["contribution"].is_null());

        assert!(json["features"]["cashRatio"].is_null());
        assert_eq!(json["features"]["GDP"], 27000.0);
        assert!(json["features"]["quickRatio"].is_null());
    }
}
