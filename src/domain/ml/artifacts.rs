//! Capability traits for the fitted model artifacts.
//!
//! The scaler, classifier, label decoder and attribution explainer are fitted
//! offline against [`FEATURE_NAMES`](super::feature_registry::FEATURE_NAMES)
//! and are read-only for the lifetime of the process. The pipeline only ever
//! talks to them through these traits, so tests can swap in mock artifacts.

use crate::domain::errors::ModelError;
use std::sync::Arc;

/// Maps a raw feature vector to the normalized space the classifier was fitted in.
pub trait Scaler: Send + Sync {
    /// Number of input features the scaler was fitted on.
    fn n_features(&self) -> usize;

    /// Undefined slots must come back undefined; the scaler never imputes.
    fn transform(&self, raw: &[Option<f64>]) -> Result<Vec<Option<f64>>, ModelError>;
}

pub trait Classifier: Send + Sync {
    fn n_features(&self) -> usize;

    fn predict_class_index(&self, scaled: &[Option<f64>]) -> Result<usize, ModelError>;

    /// Whether [`Classifier::predict_probabilities`] yields per-class probabilities.
    fn supports_confidence(&self) -> bool {
        false
    }

    /// Per-class probabilities, or `None` when the model has no such capability.
    fn predict_probabilities(&self, _scaled: &[Option<f64>]) -> Result<Option<Vec<f64>>, ModelError> {
        Ok(None)
    }

    fn name(&self) -> &str;
}

/// Maps a class index back to the integer rating label it was encoded from.
pub trait LabelDecoder: Send + Sync {
    fn n_classes(&self) -> usize;

    fn decode(&self, class_index: usize) -> Result<i64, ModelError>;
}

/// Raw explainer output: either one vector, or one vector per class.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribution {
    Single(Vec<f64>),
    PerClass(Vec<Vec<f64>>),
}

impl Attribution {
    /// Collapses the explainer output into the vector for the realized class.
    pub fn for_class(self, class_index: usize) -> Result<Vec<f64>, ModelError> {
        match self {
            Attribution::Single(values) => Ok(values),
            Attribution::PerClass(mut per_class) => {
                let n_classes = per_class.len();
                if class_index >= n_classes {
                    return Err(ModelError::UnknownClass {
                        index: class_index,
                        n_classes,
                    });
                }
                Ok(per_class.swap_remove(class_index))
            }
        }
    }
}

pub trait AttributionExplainer: Send + Sync {
    fn n_features(&self) -> usize;

    fn explain(&self, scaled: &[Option<f64>]) -> Result<Attribution, ModelError>;
}

/// The fitted artifacts, loaded once and shared read-only across requests.
#[derive(Clone)]
pub struct ModelContext {
    pub scaler: Arc<dyn Scaler>,
    pub classifier: Arc<dyn Classifier>,
    pub decoder: Arc<dyn LabelDecoder>,
    pub explainer: Arc<dyn AttributionExplainer>,
}

impl ModelContext {
    pub fn new(
        scaler: Arc<dyn Scaler>,
        classifier: Arc<dyn Classifier>,
        decoder: Arc<dyn LabelDecoder>,
        explainer: Arc<dyn AttributionExplainer>,
    ) -> Self {
        Self {
            scaler,
            classifier,
            decoder,
            explainer,
        }
    }

    /// Checks every artifact against the expected feature width.
    pub fn validate(&self, n_features: usize) -> Result<(), ModelError> {
        let widths = [
            ("scaler", self.scaler.n_features()),
            ("classifier", self.classifier.n_features()),
            ("explainer", self.explainer.n_features()),
        ];
        for (artifact, actual) in widths {
            if actual != n_features {
                return Err(ModelError::SchemaMismatch {
                    artifact: artifact.to_string(),
                    expected: n_features,
                    actual,
                });
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for ModelContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelContext")
            .field("classifier", &self.classifier.name())
            .field("n_classes", &self.decoder.n_classes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_class_attribution_selects_realized_class() {
        let attribution = Attribution::PerClass(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        assert_eq!(attribution.for_class(1).unwrap(), vec![3.0, 4.0]);
    }

    #[test]
    fn test_single_attribution_ignores_class() {
        let attribution = Attribution::Single(vec![0.5, -0.5]);
        assert_eq!(attribution.for_class(7).unwrap(), vec![0.5, -0.5]);
    }

    #[test]
    fn test_per_class_attribution_out_of_range() {
        let attribution = Attribution::PerClass(vec![vec![1.0]]);
        assert!(matches!(
            attribution.for_class(2),
            Err(ModelError::UnknownClass { index: 2, n_classes: 1 })
        ));
    }
}
