use crate::domain::errors::ModelError;
use crate::domain::ml::artifacts::Classifier;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::RandomForestClassifier;
use smartcore::linalg::basic::matrix::DenseMatrix;

pub type ForestModel = RandomForestClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;

/// Compute numerically stable softmax.
pub fn softmax(scores: &[f64]) -> Vec<f64> {
    let max_score = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exp_scores: Vec<f64> = scores.iter().map(|&s| (s - max_score).exp()).collect();
    let sum: f64 = exp_scores.iter().sum();
    exp_scores.iter().map(|e| e / sum).collect()
}

/// Index of the first maximum, so ties resolve to the lower class.
fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if v <= b => best,
            _ if v.is_nan() => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Multinomial (or binary, with a single coefficient row) logistic regression.
///
/// Undefined normalized slots contribute nothing to the logits, which is mean
/// imputation in the standardized space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticClassifier {
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl LogisticClassifier {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.coefficients.is_empty() {
            return Err(ModelError::EmptyArtifact {
                artifact: "classifier.coefficients".to_string(),
            });
        }
        let width = self.n_features();
        if self.intercepts.len() != self.coefficients.len() {
            return Err(ModelError::SchemaMismatch {
                artifact: "classifier.intercepts".to_string(),
                expected: self.coefficients.len(),
                actual: self.intercepts.len(),
            });
        }
        if let Some(row) = self.coefficients.iter().find(|row| row.len() != width) {
            return Err(ModelError::SchemaMismatch {
                artifact: "classifier.coefficients".to_string(),
                expected: width,
                actual: row.len(),
            });
        }
        Ok(())
    }

    pub fn n_classes(&self) -> usize {
        match self.coefficients.len() {
            1 => 2,
            n => n,
        }
    }

    fn logits(&self, scaled: &[Option<f64>]) -> Result<Vec<f64>, ModelError> {
        if scaled.len() != self.n_features() {
            return Err(ModelError::SchemaMismatch {
                artifact: "classifier".to_string(),
                expected: self.n_features(),
                actual: scaled.len(),
            });
        }
        Ok(self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, intercept)| {
                intercept
                    + row
                        .iter()
                        .zip(scaled)
                        .filter_map(|(w, x)| x.map(|x| w * x))
                        .sum::<f64>()
            })
            .collect())
    }

    fn probabilities(&self, scaled: &[Option<f64>]) -> Result<Vec<f64>, ModelError> {
        let logits = self.logits(scaled)?;
        Ok(match logits.as_slice() {
            [z] => {
                let p = 1.0 / (1.0 + (-z).exp());
                vec![1.0 - p, p]
            }
            _ => softmax(&logits),
        })
    }
}

impl Classifier for LogisticClassifier {
    fn n_features(&self) -> usize {
        self.coefficients.first().map(Vec::len).unwrap_or(0)
    }

    fn predict_class_index(&self, scaled: &[Option<f64>]) -> Result<usize, ModelError> {
        let probabilities = self.probabilities(scaled)?;
        argmax(&probabilities).ok_or_else(|| ModelError::InferenceFailed {
            reason: "logistic classifier produced no finite probability".to_string(),
        })
    }

    fn supports_confidence(&self) -> bool {
        true
    }

    fn predict_probabilities(&self, scaled: &[Option<f64>]) -> Result<Option<Vec<f64>>, ModelError> {
        self.probabilities(scaled).map(Some)
    }

    fn name(&self) -> &str {
        "Logistic Regression"
    }
}

/// smartcore random forest. Predicts a class index only, no probabilities.
#[derive(Serialize, Deserialize)]
pub struct ForestClassifier {
    pub n_features: usize,
    pub model: ForestModel,
}

impl std::fmt::Debug for ForestClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForestClassifier")
            .field("n_features", &self.n_features)
            .finish_non_exhaustive()
    }
}

impl Classifier for ForestClassifier {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_class_index(&self, scaled: &[Option<f64>]) -> Result<usize, ModelError> {
        if scaled.len() != self.n_features {
            return Err(ModelError::SchemaMismatch {
                artifact: "classifier".to_string(),
                expected: self.n_features,
                actual: scaled.len(),
            });
        }

        // Undefined slots go to the trees as NaN
        let row: Vec<f64> = scaled.iter().map(|v| v.unwrap_or(f64::NAN)).collect();
        let input_matrix = match DenseMatrix::from_2d_vec(&vec![row]) {
            Ok(m) => m,
            Err(e) => {
                return Err(ModelError::InferenceFailed {
                    reason: format!("Matrix creation failed: {}", e),
                });
            }
        };

        match self.model.predict(&input_matrix) {
            Ok(predictions) => {
                let class = predictions.first().ok_or_else(|| ModelError::InferenceFailed {
                    reason: "No prediction returned".to_string(),
                })?;
                usize::try_from(*class).map_err(|_| ModelError::InferenceFailed {
                    reason: format!("Negative class index {}", class),
                })
            }
            Err(e) => Err(ModelError::InferenceFailed {
                reason: format!("Prediction failed: {}", e),
            }),
        }
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }
}

/// On-disk classifier document, tagged by `kind`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    Logistic(LogisticClassifier),
    RandomForest(ForestClassifier),
}

impl ClassifierArtifact {
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            ClassifierArtifact::Logistic(model) => model.validate(),
            ClassifierArtifact::RandomForest(_) => Ok(()),
        }
    }

    /// Class count, when the model family exposes it.
    pub fn n_classes(&self) -> Option<usize> {
        match self {
            ClassifierArtifact::Logistic(model) => Some(model.n_classes()),
            ClassifierArtifact::RandomForest(_) => None,
        }
    }
}

impl Classifier for ClassifierArtifact {
    fn n_features(&self) -> usize {
        match self {
            ClassifierArtifact::Logistic(model) => model.n_features(),
            ClassifierArtifact::RandomForest(model) => model.n_features(),
        }
    }

    fn predict_class_index(&self, scaled: &[Option<f64>]) -> Result<usize, ModelError> {
        match self {
            ClassifierArtifact::Logistic(model) => model.predict_class_index(scaled),
            ClassifierArtifact::RandomForest(model) => model.predict_class_index(scaled),
        }
    }

    fn supports_confidence(&self) -> bool {
        match self {
            ClassifierArtifact::Logistic(model) => model.supports_confidence(),
            ClassifierArtifact::RandomForest(model) => model.supports_confidence(),
        }
    }

    fn predict_probabilities(&self, scaled: &[Option<f64>]) -> Result<Option<Vec<f64>>, ModelError> {
        match self {
            ClassifierArtifact::Logistic(model) => model.predict_probabilities(scaled),
            ClassifierArtifact::RandomForest(model) => model.predict_probabilities(scaled),
        }
    }

    fn name(&self) -> &str {
        match self {
            ClassifierArtifact::Logistic(model) => model.name(),
            ClassifierArtifact::RandomForest(model) => model.name(),
        }
    }
}
