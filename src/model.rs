//! The closed set of model variants the service can serve.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::DynamicImage;
use ndarray::Array4;

use crate::error::PredictError;
use crate::preprocess;

/// One of the three independently trained classifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// Custom convolutional network trained on single-channel input.
    Cnn,
    /// ResNet50 backbone trained on grayscale replicated to three channels.
    Resnet50,
    /// DenseNet121 backbone trained on grayscale replicated to three channels.
    Densenet121,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [ModelKind::Cnn, ModelKind::Resnet50, ModelKind::Densenet121];

    /// Wire name used in requests and responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::Cnn => "cnn",
            ModelKind::Resnet50 => "resnet50",
            ModelKind::Densenet121 => "densenet121",
        }
    }

    /// File name of the ONNX artifact inside the models directory.
    pub fn artifact_file(self) -> &'static str {
        match self {
            ModelKind::Cnn => "cnn_model.onnx",
            ModelKind::Resnet50 => "resnet50_model.onnx",
            ModelKind::Densenet121 => "densenet121_model.onnx",
        }
    }

    pub fn artifact_path(self, models_dir: &Path) -> PathBuf {
        models_dir.join(self.artifact_file())
    }

    /// Number of input channels the variant was trained on.
    pub fn channels(self) -> usize {
        match self {
            ModelKind::Cnn => 1,
            ModelKind::Resnet50 | ModelKind::Densenet121 => 3,
        }
    }

    /// Runs the preprocessor this variant expects.
    pub fn preprocess(self, image: &DynamicImage) -> Array4<f32> {
        match self {
            ModelKind::Cnn => preprocess::single_channel(image),
            ModelKind::Resnet50 | ModelKind::Densenet121 => preprocess::replicated_channel(image),
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| PredictError::validation("Invalid model name"))
    }
}
