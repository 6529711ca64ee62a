use crate::domain::errors::ModelError;
use crate::domain::ml::artifacts::LabelDecoder;
use serde::{Deserialize, Serialize};

/// Class index to integer rating, in the order the encoder was fitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<i64>,
}

impl LabelDecoder for LabelEncoder {
    fn n_classes(&self) -> usize {
        self.classes.len()
    }

    fn decode(&self, class_index: usize) -> Result<i64, ModelError> {
        self.classes
            .get(class_index)
            .copied()
            .ok_or(ModelError::UnknownClass {
                index: class_index,
                n_classes: self.classes.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        let encoder: LabelEncoder = serde_json::from_str(r#"{"classes": [1, 2, 4, 7]}"#).unwrap();
        assert_eq!(encoder.decode(2).unwrap(), 4);
        assert!(matches!(
            encoder.decode(4),
            Err(ModelError::UnknownClass { index: 4, n_classes: 4 })
        ));
    }
}
