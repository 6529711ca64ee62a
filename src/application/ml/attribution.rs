use crate::domain::errors::ModelError;
use crate::domain::ml::artifacts::AttributionExplainer;
use crate::domain::ml::feature_registry::{FEATURE_COUNT, FEATURE_NAMES};
use crate::domain::rating::FeatureContribution;
use std::cmp::Ordering;

pub const DEFAULT_TOP_K: usize = 3;

/// Ranking key: absolute value, with NaN contributions ranked last.
fn magnitude(contribution: Option<f64>) -> f64 {
    contribution.map(f64::abs).unwrap_or(f64::NEG_INFINITY)
}

/// Sorts by descending absolute contribution. The sort is stable, so ties keep
/// their incoming order (schema order on first ranking).
pub fn rank_contributions(contributions: &mut [FeatureContribution]) {
    contributions.sort_by(|a, b| {
        magnitude(b.contribution)
            .partial_cmp(&magnitude(a.contribution))
            .unwrap_or(Ordering::Equal)
    });
}

/// Full ranking of every feature plus a top-K view over it.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedContributions {
    ranked: Vec<FeatureContribution>,
}

impl RankedContributions {
    pub fn all(&self) -> &[FeatureContribution] {
        &self.ranked
    }

    /// Always a prefix of [`RankedContributions::all`].
    pub fn top(&self, k: usize) -> &[FeatureContribution] {
        &self.ranked[..k.min(self.ranked.len())]
    }

    pub fn into_vec(self) -> Vec<FeatureContribution> {
        self.ranked
    }
}

/// Computes per-feature contributions for one day and ranks them.
pub struct AttributionRanker<'a> {
    explainer: &'a dyn AttributionExplainer,
}

impl<'a> AttributionRanker<'a> {
    pub fn new(explainer: &'a dyn AttributionExplainer) -> Self {
        Self { explainer }
    }

    pub fn rank(
        &self,
        scaled: &[Option<f64>],
        class_index: usize,
    ) -> Result<RankedContributions, ModelError> {
        let values = self.explainer.explain(scaled)?.for_class(class_index)?;
        if values.len() != FEATURE_COUNT {
            return Err(ModelError::SchemaMismatch {
                artifact: "explainer output".to_string(),
                expected: FEATURE_COUNT,
                actual: values.len(),
            });
        }

        let mut ranked: Vec<FeatureContribution> = FEATURE_NAMES
            .iter()
            .copied()
            .zip(values)
            .map(|(feature, value)| FeatureContribution {
                feature,
                contribution: (!value.is_nan()).then_some(value),
            })
            .collect();
        rank_contributions(&mut ranked);

        Ok(RankedContributions { ranked })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ml::artifacts::Attribution;
    use crate::infrastructure::mock::MockExplainer;

    fn contribution(feature: &'static str, value: f64) -> FeatureContribution {
        FeatureContribution {
            feature,
            contribution: Some(value),
        }
    }

    fn features(ranked: &[FeatureContribution]) -> Vec<&'static str> {
        ranked.iter().map(|c| c.feature).collect()
    }

    #[test]
    fn test_rank_by_absolute_value_keeps_sign() {
        let mut values = vec![0.0; FEATURE_COUNT];
        values[0] = 0.1;
        values[3] = -0.9;
        values[8] = 0.5;
        let explainer = MockExplainer::fixed(Attribution::Single(values));

        let ranked = AttributionRanker::new(&explainer)
            .rank(&[None; FEATURE_COUNT], 0)
            .unwrap();

        assert_eq!(&features(ranked.top(3)), &["debtRatio", "volatility", "currentRatio"]);
        assert_eq!(ranked.all()[0].contribution, Some(-0.9));
        assert_eq!(ranked.all().len(), FEATURE_COUNT);
    }

    #[test]
    fn test_ties_keep_schema_order() {
        let explainer = MockExplainer::fixed(Attribution::Single(vec![0.25; FEATURE_COUNT]));
        let ranked = AttributionRanker::new(&explainer)
            .rank(&[None; FEATURE_COUNT], 0)
            .unwrap();
        assert_eq!(features(ranked.all()), FEATURE_NAMES.to_vec());
    }

    #[test]
    fn test_negative_and_positive_tie_first_occurrence_wins() {
        let mut contributions = vec![
            contribution("a", 0.4),
            contribution("b", -0.4),
            contribution("c", 0.1),
        ];
        rank_contributions(&mut contributions);
        assert_eq!(features(&contributions), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_reranking_is_idempotent() {
        let mut contributions = vec![
            contribution("a", 0.1),
            contribution("b", -0.3),
            contribution("c", 0.3),
            FeatureContribution {
                feature: "d",
                contribution: None,
            },
            contribution("e", 0.0),
            contribution("f", -2.0),
        ];
        rank_contributions(&mut contributions);
        let once = contributions.clone();
        rank_contributions(&mut contributions);
        assert_eq!(contributions, once);
        assert_eq!(features(&once), vec!["f", "b", "c", "a", "e", "d"]);
    }

    #[test]
    fn test_top_is_prefix_of_full_ranking() {
        let values: Vec<f64> = (0..FEATURE_COUNT).map(|i| ((i * 7) % 5) as f64 - 2.0).collect();
        let explainer = MockExplainer::fixed(Attribution::Single(values));
        let ranked = AttributionRanker::new(&explainer)
            .rank(&[None; FEATURE_COUNT], 0)
            .unwrap();

        for k in 0..=FEATURE_COUNT + 2 {
            let top = ranked.top(k);
            assert_eq!(top, &ranked.all()[..top.len()]);
        }
        assert_eq!(ranked.top(DEFAULT_TOP_K).len(), 3);
    }

    #[test]
    fn test_per_class_output_uses_predicted_class() {
        let mut class_one = vec![0.0; FEATURE_COUNT];
        class_one[10] = 1.0;
        let explainer = MockExplainer::fixed(Attribution::PerClass(vec![
            vec![0.5; FEATURE_COUNT],
            class_one,
        ]));

        let ranked = AttributionRanker::new(&explainer)
            .rank(&[None; FEATURE_COUNT], 1)
            .unwrap();
        assert_eq!(ranked.all()[0].feature, "sentiment");
    }

    #[test]
    fn test_wrong_width_is_schema_mismatch() {
        let explainer = MockExplainer::fixed(Attribution::Single(vec![0.1; 4]));
        let result = AttributionRanker::new(&explainer).rank(&[None; FEATURE_COUNT], 0);
        assert!(matches!(
            result,
            Err(ModelError::SchemaMismatch { actual: 4, .. })
        ));
    }
}
