//! Softmax-linear classifier read from a JSON model artifact.
//!
//! ```json
//! { "image_size": 64,
//!   "labels": ["circle", "square", "triangle"],
//!   "weights": [[...], [...], [...]],
//!   "bias": [0.0, 0.0, 0.0] }
//! ```
//!
//! `weights[c]` holds one coefficient per input element of the flattened
//! `[S, S, 3]` tensor in row-major order.
use super::Classifier;
use crate::error::{Error, Result};
use crate::labels::ClassLabel;
use crate::preprocess::INPUT_CHANNELS;
use ndarray::Array4;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub image_size: usize,
    pub labels: Vec<ClassLabel>,
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

impl LinearClassifier {
    /// Parse and validate a JSON model. `location` only labels errors.
    pub fn from_json(json: &str, location: &str) -> Result<Self> {
        let model: LinearClassifier =
            serde_json::from_str(json).map_err(|e| Error::ClassifierLoad {
                location: location.to_string(),
                reason: e.to_string(),
            })?;
        model.validate().map_err(|reason| Error::ClassifierLoad {
            location: location.to_string(),
            reason,
        })?;
        Ok(model)
    }

    fn input_len(&self) -> usize {
        self.image_size * self.image_size * INPUT_CHANNELS
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.image_size == 0 {
            return Err("image_size must be positive".to_string());
        }
        if self.labels.as_slice() != ClassLabel::ALL.as_slice() {
            return Err(format!(
                "label order {:?} differs from {:?}",
                self.labels,
                ClassLabel::ALL
            ));
        }
        if self.weights.len() != self.labels.len() || self.bias.len() != self.labels.len() {
            return Err(format!(
                "expected {} weight rows and biases, got {} and {}",
                self.labels.len(),
                self.weights.len(),
                self.bias.len()
            ));
        }
        let n = self.input_len();
        if let Some((c, row)) = self.weights.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(format!("weight row {c} has {} entries, expected {n}", row.len()));
        }
        Ok(())
    }
}

impl Classifier for LinearClassifier {
    fn input_size(&self) -> usize {
        self.image_size
    }

    fn predict(&self, input: &Array4<f32>) -> Result<Vec<f32>> {
        let expected = vec![1, self.image_size, self.image_size, INPUT_CHANNELS];
        if input.shape() != expected.as_slice() {
            return Err(Error::ShapeMismatch {
                expected,
                actual: input.shape().to_vec(),
            });
        }
        let logits: Vec<f32> = self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| row.iter().zip(input.iter()).map(|(w, x)| w * x).sum::<f32>() + b)
            .collect();
        Ok(softmax(&logits))
    }
}

/// Numerically stable softmax.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_json(size: usize, labels: &str, rows: usize) -> String {
        let row = vec![0.0f32; size * size * 3];
        let weights = vec![row; rows];
        format!(
            r#"{{"image_size":{size},"labels":{labels},"weights":{},"bias":[0.0,1.0,0.0]}}"#,
            serde_json::to_string(&weights).unwrap()
        )
    }

    #[test]
    fn softmax_sums_to_one() {
        let p = softmax(&[1.0, 2.0, 3.0]);
        assert!((p.iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert!(p[2] > p[1] && p[1] > p[0]);
    }

    #[test]
    fn loads_valid_model_and_predicts_bias_winner() {
        let json = model_json(2, r#"["circle","square","triangle"]"#, 3);
        let model = LinearClassifier::from_json(&json, "test").unwrap();
        let probs = model.predict(&Array4::zeros((1, 2, 2, 3))).unwrap();
        assert_eq!(probs.len(), 3);
        assert!(probs[1] > probs[0] && probs[1] > probs[2]);
    }

    #[test]
    fn rejects_reordered_labels() {
        let json = model_json(2, r#"["square","circle","triangle"]"#, 3);
        let err = LinearClassifier::from_json(&json, "test").unwrap_err();
        assert!(matches!(err, Error::ClassifierLoad { .. }));
    }

    #[test]
    fn rejects_wrong_weight_count() {
        let json = model_json(2, r#"["circle","square","triangle"]"#, 2);
        assert!(LinearClassifier::from_json(&json, "test").is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        let err = LinearClassifier::from_json("{ not json", "test").unwrap_err();
        assert!(matches!(err, Error::ClassifierLoad { .. }));
    }

    #[test]
    fn predict_checks_input_shape() {
        let json = model_json(2, r#"["circle","square","triangle"]"#, 3);
        let model = LinearClassifier::from_json(&json, "test").unwrap();
        let err = model.predict(&Array4::zeros((1, 3, 3, 3))).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }
}
