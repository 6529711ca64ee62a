//! Model artifact and sentiment table locations.

use crate::infrastructure::ml::ArtifactStore;
use std::env;
use std::path::PathBuf;

/// Artifact environment configuration
#[derive(Debug, Clone)]
pub struct ArtifactEnvConfig {
    pub model_dir: PathBuf,
    pub scaler_file: String,
    pub classifier_file: String,
    pub label_encoder_file: String,
    pub explainer_file: String,
    pub sentiment_file: String,
}

impl Default for ArtifactEnvConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            scaler_file: "scaler.json".to_string(),
            classifier_file: "classifier.json".to_string(),
            label_encoder_file: "label_encoder.json".to_string(),
            explainer_file: "explainer.json".to_string(),
            sentiment_file: "sentiment.csv".to_string(),
        }
    }
}

impl ArtifactEnvConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            model_dir: env::var("MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),
            scaler_file: env::var("SCALER_FILE").unwrap_or(defaults.scaler_file),
            classifier_file: env::var("CLASSIFIER_FILE").unwrap_or(defaults.classifier_file),
            label_encoder_file: env::var("LABEL_ENCODER_FILE")
                .unwrap_or(defaults.label_encoder_file),
            explainer_file: env::var("EXPLAINER_FILE").unwrap_or(defaults.explainer_file),
            sentiment_file: env::var("SENTIMENT_FILE").unwrap_or(defaults.sentiment_file),
        }
    }

    pub fn artifact_store(&self) -> ArtifactStore {
        ArtifactStore {
            scaler_path: self.model_dir.join(&self.scaler_file),
            classifier_path: self.model_dir.join(&self.classifier_file),
            label_encoder_path: self.model_dir.join(&self.label_encoder_file),
            explainer_path: self.model_dir.join(&self.explainer_file),
        }
    }

    pub fn sentiment_path(&self) -> PathBuf {
        self.model_dir.join(&self.sentiment_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_paths_join_model_dir() {
        let config = ArtifactEnvConfig::default();
        let store = config.artifact_store();
        assert_eq!(store.scaler_path, PathBuf::from("models/scaler.json"));
        assert_eq!(store.explainer_path, PathBuf::from("models/explainer.json"));
        assert_eq!(config.sentiment_path(), PathBuf::from("models/sentiment.csv"));
    }
}
