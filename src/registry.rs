//! Holds the models loaded at startup.
//!
//! The registry is built once before the server starts accepting requests
//! and is read-only afterwards. A model that failed to load is recorded as
//! absent; the others keep serving.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::{LoadError, PredictError};
use crate::inference::{Classifier, OrtClassifier};
use crate::model::ModelKind;

#[derive(Clone, Default)]
pub struct ModelRegistry {
    slots: [Option<Arc<dyn Classifier>>; 3],
}

impl ModelRegistry {
    /// An empty registry; every model reports as unavailable.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads every model artifact from `models_dir` with ONNX Runtime.
    pub fn load(models_dir: &Path) -> Self {
        Self::load_with(models_dir, |path| {
            OrtClassifier::load(path).map(|c| Arc::new(c) as Arc<dyn Classifier>)
        })
    }

    /// Loads every model with `loader`, recording failures as absent.
    pub fn load_with<F>(models_dir: &Path, mut loader: F) -> Self
    where
        F: FnMut(&Path) -> Result<Arc<dyn Classifier>, LoadError>,
    {
        let mut registry = Self::empty();
        for kind in ModelKind::ALL {
            let path = kind.artifact_path(models_dir);
            match loader(&path) {
                Ok(classifier) => {
                    tracing::info!(model = %kind, path = %path.display(), "loaded model");
                    registry.slots[kind.index()] = Some(classifier);
                }
                Err(LoadError::NotFound(_)) => {
                    tracing::warn!(model = %kind, path = %path.display(), "model file not found");
                }
                Err(e) => {
                    tracing::warn!(model = %kind, path = %path.display(), error = %e, "failed to load model");
                }
            }
        }
        registry
    }

    /// Installs a classifier for `kind`, replacing any previous one.
    pub fn with_model(mut self, kind: ModelKind, classifier: Arc<dyn Classifier>) -> Self {
        self.slots[kind.index()] = Some(classifier);
        self
    }

    pub fn get(&self, kind: ModelKind) -> Result<&dyn Classifier, PredictError> {
        self.slots[kind.index()]
            .as_deref()
            .ok_or(PredictError::UnavailableModel(kind))
    }

    pub fn is_loaded(&self, kind: ModelKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    /// Names of the models that loaded, in canonical order.
    pub fn loaded(&self) -> Vec<ModelKind> {
        ModelKind::ALL
            .into_iter()
            .filter(|kind| self.is_loaded(*kind))
            .collect()
    }

    /// Load status of every model keyed by wire name.
    pub fn status(&self) -> BTreeMap<&'static str, bool> {
        ModelKind::ALL
            .into_iter()
            .map(|kind| (kind.as_str(), self.is_loaded(kind)))
            .collect()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("loaded", &self.loaded())
            .finish()
    }
}
