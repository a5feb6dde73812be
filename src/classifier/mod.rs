//! Classifier seam: anything that maps a `[1, S, S, 3]` tensor to one score
//! per label in [`ClassLabel::ALL`] order.
//!
//! Loading is asynchronous. [`spawn_classifier_load`] starts it on the tokio
//! runtime and hands back a [`ClassifierLoad`]; dropping the handle abandons
//! the result without interrupting the task.

pub mod linear;

use crate::error::{Error, Result};
use crate::image::source::{fetch_bytes, is_remote};
use crate::labels::{argmax, ClassLabel};
use log::info;
use ndarray::Array4;
use serde::Serialize;
use tokio::task::JoinHandle;

pub use linear::LinearClassifier;

pub trait Classifier: Send + Sync {
    /// Side length `S` of the square input the model expects.
    fn input_size(&self) -> usize;

    /// Probability per label, in [`ClassLabel::ALL`] order.
    fn predict(&self, input: &Array4<f32>) -> Result<Vec<f32>>;
}

/// Winning label and its probability.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Prediction {
    pub label: ClassLabel,
    pub confidence: f32,
}

impl Prediction {
    pub fn confidence_percent(&self) -> f32 {
        self.confidence * 100.0
    }
}

/// Arg-max over `scores`, mapped through [`ClassLabel::ALL`].
pub fn decode_prediction(scores: &[f32]) -> Result<Prediction> {
    let expected = ClassLabel::ALL.len();
    if scores.len() != expected {
        return Err(Error::ClassifierOutputMismatch {
            expected,
            actual: scores.len(),
        });
    }
    let best = argmax(scores).ok_or(Error::ClassifierOutputMismatch {
        expected,
        actual: 0,
    })?;
    Ok(Prediction {
        label: ClassLabel::ALL[best],
        confidence: scores[best],
    })
}

/// Read a model from a file path or an `http(s)://` URL.
pub async fn load_classifier(location: &str) -> Result<LinearClassifier> {
    let load_err = |reason: String| Error::ClassifierLoad {
        location: location.to_string(),
        reason,
    };
    let bytes = if is_remote(location) {
        fetch_bytes(location)
            .await
            .map_err(|e| load_err(e.to_string()))?
    } else {
        tokio::fs::read(location)
            .await
            .map_err(|e| load_err(e.to_string()))?
    };
    let json = String::from_utf8(bytes).map_err(|e| load_err(e.to_string()))?;
    let model = LinearClassifier::from_json(&json, location)?;
    info!("classifier loaded from {location} (input {0}x{0})", model.image_size);
    Ok(model)
}

/// Pending classifier load. Await [`ClassifierLoad::wait`] for the result or
/// drop the handle to abandon it.
pub struct ClassifierLoad {
    location: String,
    handle: JoinHandle<Result<LinearClassifier>>,
}

impl ClassifierLoad {
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn wait(self) -> Result<LinearClassifier> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(Error::ClassifierLoad {
                location: self.location,
                reason: e.to_string(),
            }),
        }
    }
}

/// Start loading on the current tokio runtime.
pub fn spawn_classifier_load(location: impl Into<String>) -> ClassifierLoad {
    let location = location.into();
    let task_location = location.clone();
    let handle = tokio::spawn(async move { load_classifier(&task_location).await });
    ClassifierLoad { location, handle }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_maps_index_through_label_order() {
        let p = decode_prediction(&[0.1, 0.2, 0.7]).unwrap();
        assert_eq!(p.label, ClassLabel::Triangle);
        assert!((p.confidence_percent() - 70.0).abs() < 1e-4);
    }

    #[test]
    fn decode_tie_goes_to_first_label() {
        let p = decode_prediction(&[0.5, 0.5, 0.0]).unwrap();
        assert_eq!(p.label, ClassLabel::Circle);
    }

    #[test]
    fn decode_rejects_wrong_length() {
        assert!(matches!(
            decode_prediction(&[0.5, 0.5]),
            Err(Error::ClassifierOutputMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[tokio::test]
    async fn missing_model_file_is_load_failure() {
        let err = load_classifier("/nonexistent/shape-model.json")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ClassifierLoad { .. }));
    }

    #[tokio::test]
    async fn spawned_load_reads_model_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let model = LinearClassifier {
            image_size: 2,
            labels: ClassLabel::ALL.to_vec(),
            weights: vec![vec![0.0; 12]; 3],
            bias: vec![0.0; 3],
        };
        std::fs::write(&path, serde_json::to_string(&model).unwrap()).unwrap();

        let pending = spawn_classifier_load(path.display().to_string());
        let loaded = pending.wait().await.unwrap();
        assert_eq!(loaded.input_size(), 2);
    }
}
