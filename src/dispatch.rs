//! Routes an image through the selected model and reduces its output.

use image::DynamicImage;
use serde::Serialize;

use crate::error::PredictError;
use crate::labels;
use crate::model::ModelKind;
use crate::registry::ModelRegistry;

/// A single classification outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: &'static str,
    /// Peak class probability as a percentage, rounded to two decimals.
    pub confidence: f64,
}

/// Classifies `image` with the model registered for `kind`.
pub fn predict(
    registry: &ModelRegistry,
    kind: ModelKind,
    image: &DynamicImage,
) -> Result<Prediction, PredictError> {
    let classifier = registry.get(kind)?;
    let tensor = kind.preprocess(image);
    let scores = classifier.infer(tensor)?;

    let (index, peak) = argmax(&scores)
        .ok_or_else(|| PredictError::internal(format!("model {kind} returned no scores")))?;

    let prediction = Prediction {
        label: labels::label(index),
        confidence: round2(f64::from(peak) * 100.0),
    };
    tracing::debug!(model = %kind, index, label = prediction.label, confidence = prediction.confidence, "prediction");
    Ok(prediction)
}

/// Index and value of the first maximum.
fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
