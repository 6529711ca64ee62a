use crate::domain::errors::ModelError;
use crate::domain::ml::artifacts::Scaler;
use crate::domain::ml::feature_registry::FEATURE_NAMES;
use serde::{Deserialize, Serialize};

/// Per-feature standardization `(x - mean) / scale`, fitted offline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// The fitted feature order must be the registry order, slot for slot.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (artifact, len) in [
            ("scaler.feature_names", self.feature_names.len()),
            ("scaler.mean", self.mean.len()),
            ("scaler.scale", self.scale.len()),
        ] {
            if len != FEATURE_NAMES.len() {
                return Err(ModelError::SchemaMismatch {
                    artifact: artifact.to_string(),
                    expected: FEATURE_NAMES.len(),
                    actual: len,
                });
            }
        }

        if let Some((position, (found, expected))) = self
            .feature_names
            .iter()
            .zip(FEATURE_NAMES)
            .enumerate()
            .find(|(_, (found, expected))| found.as_str() != *expected)
        {
            return Err(ModelError::FeatureOrder {
                artifact: "scaler".to_string(),
                position,
                expected: expected.to_string(),
                found: found.clone(),
            });
        }
        Ok(())
    }
}

impl Scaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, raw: &[Option<f64>]) -> Result<Vec<Option<f64>>, ModelError> {
        if raw.len() != self.mean.len() {
            return Err(ModelError::SchemaMismatch {
                artifact: "scaler".to_string(),
                expected: self.mean.len(),
                actual: raw.len(),
            });
        }

        Ok(raw
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(value, (mean, scale))| {
                // A constant feature is fitted with scale 0; it is only centered.
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                value.map(|x| (x - mean) / scale)
            })
            .collect())
    }
}
