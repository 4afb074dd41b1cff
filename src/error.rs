//! Error types for the prediction pipeline.
//!
//! Every failure a request can run into is one of the four [`PredictError`]
//! kinds. The HTTP layer turns each kind into a `{success: false, error}`
//! body with a matching status code, so nothing escapes to the client as a
//! raw fault.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::model::ModelKind;

/// Message returned to clients for any internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error during prediction";

/// Errors produced while validating, decoding or classifying a request.
#[derive(Error, Debug)]
pub enum PredictError {
    /// The request body is missing a field or carries an invalid value.
    #[error("{0}")]
    Validation(String),

    /// The image payload is not valid base64 or not a readable image.
    #[error("Error decoding image: {0}")]
    Decode(String),

    /// The selector is valid but its model never loaded.
    #[error("Model {0} is not available. Please ensure the model file exists.")]
    UnavailableModel(ModelKind),

    /// Anything unanticipated from preprocessing or inference.
    #[error("internal: {0}")]
    Internal(String),
}

impl PredictError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn decode(error: impl std::fmt::Display) -> Self {
        Self::Decode(error.to_string())
    }

    pub fn internal(error: impl std::fmt::Display) -> Self {
        Self::Internal(error.to_string())
    }

    /// The message a client is allowed to see.
    pub fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<ort::Error> for PredictError {
    fn from(error: ort::Error) -> Self {
        Self::internal(error)
    }
}

impl From<ndarray::ShapeError> for PredictError {
    fn from(error: ndarray::ShapeError) -> Self {
        Self::internal(error)
    }
}

impl ResponseError for PredictError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Decode(_) => StatusCode::BAD_REQUEST,
            Self::UnavailableModel(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let Self::Internal(detail) = self {
            tracing::error!(%detail, "prediction failed");
        }
        error_body(self.status_code(), &self.client_message())
    }
}

/// Builds the JSON error envelope shared by every failing endpoint.
pub fn error_body(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "success": false,
        "error": message,
    }))
}

/// Errors raised while loading a model artifact at startup.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("model file not found: {0}")]
    NotFound(std::path::PathBuf),

    #[error(transparent)]
    Session(#[from] ort::Error),
}
