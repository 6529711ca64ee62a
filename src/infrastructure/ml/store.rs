use super::classifier::ClassifierArtifact;
use super::explainer::ExplainerArtifact;
use super::label_encoder::LabelEncoder;
use super::scaler::StandardScaler;
use crate::domain::errors::ModelError;
use crate::domain::ml::artifacts::{Classifier, LabelDecoder, ModelContext};
use crate::domain::ml::feature_registry::FEATURE_COUNT;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Locations of the four fitted artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    pub scaler_path: PathBuf,
    pub classifier_path: PathBuf,
    pub label_encoder_path: PathBuf,
    pub explainer_path: PathBuf,
}

impl ArtifactStore {
    /// Standard file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            scaler_path: dir.join("scaler.json"),
            classifier_path: dir.join("classifier.json"),
            label_encoder_path: dir.join("label_encoder.json"),
            explainer_path: dir.join("explainer.json"),
        }
    }

    /// Reads and validates every artifact. Nothing is served from a partially
    /// valid set: any width or order mismatch fails the whole load.
    pub fn load(&self) -> Result<ModelContext, ModelError> {
        let scaler: StandardScaler = read_json(&self.scaler_path)?;
        scaler.validate()?;

        let classifier: ClassifierArtifact = read_json(&self.classifier_path)?;
        classifier.validate()?;

        let decoder: LabelEncoder = read_json(&self.label_encoder_path)?;
        if let Some(n_classes) = classifier.n_classes() {
            if n_classes != decoder.n_classes() {
                return Err(ModelError::SchemaMismatch {
                    artifact: "label_encoder.classes".to_string(),
                    expected: n_classes,
                    actual: decoder.n_classes(),
                });
            }
        }

        let explainer: ExplainerArtifact = read_json(&self.explainer_path)?;
        explainer.validate()?;
        if let Some(n_classes) = explainer.n_classes() {
            if n_classes != decoder.n_classes() {
                return Err(ModelError::SchemaMismatch {
                    artifact: "explainer.coefficients".to_string(),
                    expected: decoder.n_classes(),
                    actual: n_classes,
                });
            }
        }

        info!(
            "Loaded {} with {} classes from {:?}",
            classifier.name(),
            decoder.n_classes(),
            self.classifier_path
        );

        let ctx = ModelContext::new(
            Arc::new(scaler),
            Arc::new(classifier),
            Arc::new(decoder),
            Arc::new(explainer),
        );
        ctx.validate(FEATURE_COUNT)?;
        Ok(ctx)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let load_error = |reason: String| {
        error!("Failed to load artifact {:?}: {}", path, reason);
        ModelError::ArtifactLoad {
            path: path.display().to_string(),
            reason,
        }
    };

    let file = File::open(path).map_err(|e| load_error(e.to_string()))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| load_error(e.to_string()))
}
