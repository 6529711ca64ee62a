use thiserror::Error;

/// Errors raised by the fitted artifacts or by a schema drift between them
/// and the feature registry. These are configuration faults, never
/// per-request conditions.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Schema mismatch in {artifact}: expected {expected} features, got {actual}")]
    SchemaMismatch {
        artifact: String,
        expected: usize,
        actual: usize,
    },

    #[error("Feature order mismatch in {artifact}: slot {position} is '{found}', expected '{expected}'")]
    FeatureOrder {
        artifact: String,
        position: usize,
        expected: String,
        found: String,
    },

    #[error("Artifact {artifact} is empty")]
    EmptyArtifact { artifact: String },

    #[error("Class index {index} outside label table of {n_classes} classes")]
    UnknownClass { index: usize, n_classes: usize },

    #[error("Inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("Failed to load artifact {path}: {reason}")]
    ArtifactLoad { path: String, reason: String },
}

/// Errors related to market, macro and sentiment data acquisition
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("Unknown or invalid symbol: {symbol}")]
    InvalidSymbol { symbol: String },

    #[error("Upstream {source_name} unavailable: {reason}")]
    Upstream { source_name: String, reason: String },

    #[error("Invalid market data for {symbol}: {reason}")]
    InvalidData { symbol: String, reason: String },
}

/// Request-level failure: either the data could not be fetched or the
/// artifacts rejected the feature vector.
#[derive(Debug, Error)]
pub enum RatingError {
    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_formatting() {
        let error = ModelError::SchemaMismatch {
            artifact: "scaler".to_string(),
            expected: 11,
            actual: 10,
        };

        let msg = error.to_string();
        assert!(msg.contains("scaler"));
        assert!(msg.contains("11"));
        assert!(msg.contains("10"));
    }

    #[test]
    fn test_rating_error_is_transparent() {
        let error: RatingError = MarketDataError::InvalidSymbol {
            symbol: "ZZZZ".to_string(),
        }
        .into();

        assert_eq!(error.to_string(), "Unknown or invalid symbol: ZZZZ");
        assert!(matches!(error, RatingError::MarketData(_)));
    }
}
