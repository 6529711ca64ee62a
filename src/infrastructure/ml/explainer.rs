use crate::domain::errors::ModelError;
use crate::domain::ml::artifacts::{Attribution, AttributionExplainer};
use serde::{Deserialize, Serialize};

fn weighted(weights: &[f64], scaled: &[Option<f64>]) -> Vec<f64> {
    weights
        .iter()
        .zip(scaled)
        .map(|(w, x)| x.map(|x| w * x).unwrap_or(0.0))
        .collect()
}

fn check_width(expected: usize, scaled: &[Option<f64>]) -> Result<(), ModelError> {
    if scaled.len() != expected {
        return Err(ModelError::SchemaMismatch {
            artifact: "explainer".to_string(),
            expected,
            actual: scaled.len(),
        });
    }
    Ok(())
}

/// Exact additive attribution for a linear model over standardized input:
/// the baseline is the training mean (zero), so each feature contributes
/// `coef[class][i] * x[i]`. One vector per class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearExplainer {
    pub coefficients: Vec<Vec<f64>>,
}

/// A single global weight vector, used when the explainer is not class-aware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedExplainer {
    pub weights: Vec<f64>,
}

/// On-disk explainer document, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExplainerArtifact {
    Linear(LinearExplainer),
    Weights(WeightedExplainer),
}

impl ExplainerArtifact {
    /// Number of per-class vectors, for class-aware explainers.
    pub fn n_classes(&self) -> Option<usize> {
        match self {
            ExplainerArtifact::Linear(linear) => Some(linear.coefficients.len()),
            ExplainerArtifact::Weights(_) => None,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if let ExplainerArtifact::Linear(linear) = self {
            if linear.coefficients.is_empty() {
                return Err(ModelError::EmptyArtifact {
                    artifact: "explainer.coefficients".to_string(),
                });
            }
            let width = self.n_features();
            if let Some(row) = linear.coefficients.iter().find(|row| row.len() != width) {
                return Err(ModelError::SchemaMismatch {
                    artifact: "explainer.coefficients".to_string(),
                    expected: width,
                    actual: row.len(),
                });
            }
        }
        Ok(())
    }
}

impl AttributionExplainer for ExplainerArtifact {
    fn n_features(&self) -> usize {
        match self {
            ExplainerArtifact::Linear(linear) => {
                linear.coefficients.first().map(Vec::len).unwrap_or(0)
            }
            ExplainerArtifact::Weights(w) => w.weights.len(),
        }
    }

    fn explain(&self, scaled: &[Option<f64>]) -> Result<Attribution, ModelError> {
        check_width(self.n_features(), scaled)?;
        Ok(match self {
            ExplainerArtifact::Linear(linear) => Attribution::PerClass(
                linear
                    .coefficients
                    .iter()
                    .map(|row| weighted(row, scaled))
                    .collect(),
            ),
            ExplainerArtifact::Weights(w) => Attribution::Single(weighted(&w.weights, scaled)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_explainer_is_per_class() {
        let explainer = ExplainerArtifact::Linear(LinearExplainer {
            coefficients: vec![vec![1.0, -2.0], vec![0.5, 0.5]],
        });
        let attribution = explainer.explain(&[Some(2.0), None]).unwrap();
        assert_eq!(
            attribution,
            Attribution::PerClass(vec![vec![2.0, 0.0], vec![1.0, 0.0]])
        );
    }

    #[test]
    fn test_weights_explainer_is_single() {
        let explainer: ExplainerArtifact =
            serde_json::from_str(r#"{"kind": "weights", "weights": [0.5, -1.0, 2.0]}"#).unwrap();
        let attribution = explainer.explain(&[Some(2.0), Some(1.0), Some(-1.0)]).unwrap();
        assert_eq!(attribution, Attribution::Single(vec![1.0, -1.0, -2.0]));
    }

    #[test]
    fn test_ragged_coefficients_rejected() {
        let explainer = ExplainerArtifact::Linear(LinearExplainer {
            coefficients: vec![vec![1.0, 2.0], vec![1.0]],
        });
        assert!(explainer.validate().is_err());
    }

    #[test]
    fn test_class_count_only_for_linear() {
        let linear = ExplainerArtifact::Linear(LinearExplainer {
            coefficients: vec![vec![1.0]; 4],
        });
        assert_eq!(linear.n_classes(), Some(4));
        let weights = ExplainerArtifact::Weights(WeightedExplainer { weights: vec![1.0] });
        assert_eq!(weights.n_classes(), None);

        let empty = ExplainerArtifact::Linear(LinearExplainer { coefficients: vec![] });
        assert!(matches!(empty.validate(), Err(ModelError::EmptyArtifact { .. })));
    }

    #[test]
    fn test_wrong_width_rejected() {
        let explainer = ExplainerArtifact::Weights(WeightedExplainer {
            weights: vec![1.0; 3],
        });
        assert!(matches!(
            explainer.explain(&[Some(1.0)]),
            Err(ModelError::SchemaMismatch { expected: 3, actual: 1, .. })
        ));
    }
}
