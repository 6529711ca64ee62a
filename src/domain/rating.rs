use crate::domain::ml::feature_registry::StaticFeatures;
use chrono::NaiveDate;
use serde::Serialize;

/// Signed contribution of one feature toward the realized class.
/// `None` when the explainer produced NaN for that slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureContribution {
    pub feature: &'static str,
    pub contribution: Option<f64>,
}

/// One day of the rating series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    pub date: NaiveDate,
    pub predicted_rating: i64,
    pub class_index: usize,
    /// Probability of the winning class, `None` if the classifier has no probabilities.
    pub confidence: Option<f64>,
    pub volatility: Option<f64>,
    pub momentum: Option<f64>,
    /// Every feature, by descending absolute contribution.
    pub ranked_contributions: Vec<FeatureContribution>,
    /// Length of the top-K prefix of `ranked_contributions`.
    pub top_k: usize,
}

impl DayRecord {
    pub fn top_contributions(&self) -> &[FeatureContribution] {
        let k = self.top_k.min(self.ranked_contributions.len());
        &self.ranked_contributions[..k]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub symbol: String,
    pub as_of: NaiveDate,
    /// Chronological, oldest first.
    pub history: Vec<DayRecord>,
    pub static_features: StaticFeatures,
}

impl PredictionResult {
    pub fn latest(&self) -> Option<&DayRecord> {
        self.history.last()
    }
}
