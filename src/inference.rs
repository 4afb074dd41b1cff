//! Inference runtime seam.
//!
//! The service only needs one operation from a loaded model: run a
//! preprocessed batch of one and hand back the class probabilities.
//! [`OrtClassifier`] provides it with ONNX Runtime.

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;

use crate::error::{LoadError, PredictError};

/// A loaded model that maps an NHWC input tensor to class probabilities.
pub trait Classifier: Send + Sync {
    /// Runs one forward pass and returns the probabilities of the first
    /// (and only) batch row.
    fn infer(&self, input: Array4<f32>) -> Result<Vec<f32>, PredictError>;
}

/// ONNX Runtime backed classifier.
pub struct OrtClassifier {
    // Session::run needs exclusive access.
    session: Mutex<Session>,
}

impl OrtClassifier {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        if !path.is_file() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(path)?;

        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl Classifier for OrtClassifier {
    fn infer(&self, input: Array4<f32>) -> Result<Vec<f32>, PredictError> {
        let (n, h, w, c) = input.dim();
        let (data, _) = input.into_raw_vec_and_offset();
        let input_tensor = Tensor::from_array(([n, h, w, c], data))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| PredictError::internal("inference session lock poisoned"))?;
        let outputs = session.run(ort::inputs![input_tensor])?;

        let (shape, scores) = outputs[0].try_extract_tensor::<f32>()?;
        let batch = shape.first().copied().unwrap_or(1).max(1) as usize;
        let row = scores.len() / batch;

        Ok(scores[..row].to_vec())
    }
}
