//! HTTP surface: the drawing page, `/predict` and `/health`.

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::{header::ContentType, StatusCode};
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::decode::decode_image;
use crate::dispatch;
use crate::error::{error_body, PredictError};
use crate::model::ModelKind;
use crate::registry::ModelRegistry;

const INDEX_HTML: &str = include_str!("../static/index.html");

const MISSING_PARAMETERS: &str = "Missing image or model parameter";
const INVALID_JSON: &str = "Invalid JSON body";
const NOT_FOUND: &str = "Endpoint not found";

/// Shared, read-only state handed to every request.
pub struct AppState {
    pub registry: ModelRegistry,
}

impl AppState {
    pub fn new(registry: ModelRegistry) -> Self {
        Self { registry }
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub image: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    pub prediction: &'static str,
    pub confidence: f64,
    pub model_used: &'static str,
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(INDEX_HTML)
}

#[post("/predict")]
async fn predict(
    state: web::Data<AppState>,
    body: web::Json<PredictRequest>,
) -> Result<HttpResponse, PredictError> {
    let PredictRequest { image, model } = body.into_inner();
    let (Some(image), Some(model)) = (image, model) else {
        return Err(PredictError::validation(MISSING_PARAMETERS));
    };

    let kind: ModelKind = model.parse()?;
    // Unavailable models are reported before the payload is even decoded.
    state.registry.get(kind)?;

    let image = decode_image(&image)?;
    let prediction = dispatch::predict(&state.registry, kind, &image)?;

    Ok(HttpResponse::Ok().json(PredictResponse {
        success: true,
        prediction: prediction.label,
        confidence: prediction.confidence,
        model_used: kind.as_str(),
    }))
}

#[get("/health")]
async fn health(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "models_loaded": state.registry.status(),
    }))
}

/// Fallback for every unmatched route.
pub async fn not_found() -> HttpResponse {
    error_body(StatusCode::NOT_FOUND, NOT_FOUND)
}

/// JSON extractor settings: body limit plus JSON error envelopes.
pub fn json_config(max_body_bytes: usize) -> web::JsonConfig {
    let too_large = format!(
        "File too large. Maximum size is {}MB.",
        max_body_bytes / (1024 * 1024)
    );

    web::JsonConfig::default()
        .limit(max_body_bytes)
        .content_type_required(false)
        .error_handler(move |err, _req: &HttpRequest| {
            let response = match &err {
                JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
                    error_body(StatusCode::PAYLOAD_TOO_LARGE, &too_large)
                }
                other => {
                    tracing::debug!(error = %other, "rejected request body");
                    error_body(StatusCode::BAD_REQUEST, INVALID_JSON)
                }
            };
            InternalError::from_response(err, response).into()
        })
}

/// Registers state, extractor config and routes on an `App`.
///
/// The 404 fallback is attached separately with
/// `App::default_service(web::to(not_found))`.
pub fn configure(
    state: web::Data<AppState>,
    max_body_bytes: usize,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(state)
            .app_data(json_config(max_body_bytes))
            .service(index)
            .service(predict)
            .service(health);
    }
}
