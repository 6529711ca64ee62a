use crate::domain::errors::ModelError;
use crate::domain::ml::artifacts::ModelContext;
use crate::domain::ml::feature_registry::{FEATURE_COUNT, FeatureVector};
use tracing::trace;

/// Outcome of running one feature vector through scaler, classifier and decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    pub class_index: usize,
    pub label: i64,
    pub confidence: Option<f64>,
    /// The normalized vector, reused by the attribution step.
    pub scaled: Vec<Option<f64>>,
}

/// Applies the fitted scaler then the fitted classifier to a feature vector.
pub struct InferenceAdapter<'a> {
    ctx: &'a ModelContext,
}

impl<'a> InferenceAdapter<'a> {
    pub fn new(ctx: &'a ModelContext) -> Self {
        Self { ctx }
    }

    pub fn infer(&self, features: &FeatureVector) -> Result<Inference, ModelError> {
        let scaled = self.ctx.scaler.transform(features.as_slice())?;
        if scaled.len() != FEATURE_COUNT {
            return Err(ModelError::SchemaMismatch {
                artifact: "scaler output".to_string(),
                expected: FEATURE_COUNT,
                actual: scaled.len(),
            });
        }

        let class_index = self.ctx.classifier.predict_class_index(&scaled)?;
        let label = self.ctx.decoder.decode(class_index)?;
        let confidence = self.confidence(&scaled)?;

        trace!(
            "Inference: class={} label={} confidence={:?}",
            class_index, label, confidence
        );

        Ok(Inference {
            class_index,
            label,
            confidence,
            scaled,
        })
    }

    /// Highest per-class probability. Never fabricated: `None` without the capability.
    fn confidence(&self, scaled: &[Option<f64>]) -> Result<Option<f64>, ModelError> {
        if !self.ctx.classifier.supports_confidence() {
            return Ok(None);
        }
        let probabilities = self.ctx.classifier.predict_probabilities(scaled)?;
        Ok(probabilities.and_then(|probs| {
            probs
                .into_iter()
                .filter(|p| !p.is_nan())
                .reduce(f64::max)
        }))
    }
}
