use std::io::Cursor;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use ndarray::Array4;
use serde_json::{json, Value};

use bangla_grapheme_server::inference::Classifier;
use bangla_grapheme_server::labels::LABELS;
use bangla_grapheme_server::server::{self, AppState};
use bangla_grapheme_server::{ModelKind, ModelRegistry, PredictError};

/// Puts most of the mass on one class, whatever the input.
struct Peaked {
    class: usize,
    expected_channels: usize,
}

impl Classifier for Peaked {
    fn infer(&self, input: Array4<f32>) -> Result<Vec<f32>, PredictError> {
        if input.dim() != (1, 32, 32, self.expected_channels) {
            return Err(PredictError::internal(format!("bad input shape {:?}", input.dim())));
        }
        let mut scores = vec![0.005; 68];
        scores[self.class] = 0.6651;
        Ok(scores)
    }
}

/// Derives the class from the mean intensity so different images differ.
struct MeanBucket;

impl Classifier for MeanBucket {
    fn infer(&self, input: Array4<f32>) -> Result<Vec<f32>, PredictError> {
        let mean = input.mean().unwrap_or(0.0);
        let class = ((mean * 59.0).round() as usize).min(59);
        let mut scores = vec![0.0; 68];
        scores[class] = 1.0;
        Ok(scores)
    }
}

struct Failing;

impl Classifier for Failing {
    fn infer(&self, _input: Array4<f32>) -> Result<Vec<f32>, PredictError> {
        Err(PredictError::internal("runtime exploded"))
    }
}

fn full_registry() -> ModelRegistry {
    ModelRegistry::empty()
        .with_model(ModelKind::Cnn, Arc::new(Peaked { class: 11, expected_channels: 1 }))
        .with_model(ModelKind::Resnet50, Arc::new(Peaked { class: 11, expected_channels: 3 }))
        .with_model(ModelKind::Densenet121, Arc::new(MeanBucket))
}

fn png_data_url(image: &DynamicImage) -> String {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png).unwrap();
    format!("data:image/png;base64,{}", STANDARD.encode(buf.into_inner()))
}

fn stroke_image() -> DynamicImage {
    let mut img = GrayImage::new(128, 128);
    for i in 20..108 {
        img.put_pixel(i, 64, Luma([255]));
        img.put_pixel(64, i, Luma([255]));
    }
    DynamicImage::ImageLuma8(img)
}

macro_rules! app {
    ($registry:expr) => {
        app!($registry, 16 * 1024 * 1024)
    };
    ($registry:expr, $limit:expr) => {
        test::init_service(
            App::new()
                .configure(server::configure(
                    web::Data::new(AppState::new($registry)),
                    $limit,
                ))
                .default_service(web::to(server::not_found)),
        )
        .await
    };
}

macro_rules! post_predict {
    ($app:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json($body)
            .to_request();
        let resp = test::call_service(&$app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

#[actix_web::test]
async fn predicts_with_every_loaded_model() {
    let app = app!(full_registry());
    let image = png_data_url(&stroke_image());

    for kind in ModelKind::ALL {
        let (status, body) = post_predict!(app, json!({ "image": &image, "model": kind.as_str() }));
        assert_eq!(status, StatusCode::OK, "{kind}: {body}");
        assert_eq!(body["success"], true);
        assert_eq!(body["model_used"], kind.as_str());

        let confidence = body["confidence"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&confidence));
        let prediction = body["prediction"].as_str().unwrap();
        assert!(LABELS.contains(&prediction));
    }
}

#[actix_web::test]
async fn cnn_prediction_reports_glyph_and_rounded_confidence() {
    let app = app!(full_registry());
    let (status, body) =
        post_predict!(app, json!({ "image": png_data_url(&stroke_image()), "model": "cnn" }));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "prediction": "ক", "confidence": 66.51, "model_used": "cnn" })
    );
}

#[actix_web::test]
async fn accepts_payload_without_data_url_prefix() {
    let app = app!(full_registry());
    let url = png_data_url(&stroke_image());
    let bare = url.split_once(',').unwrap().1;

    let (status, body) = post_predict!(app, json!({ "image": bare, "model": "resnet50" }));
    assert_eq!(status, StatusCode::OK, "{body}");
}

#[actix_web::test]
async fn same_image_same_prediction() {
    let app = app!(full_registry());
    let request = json!({ "image": png_data_url(&stroke_image()), "model": "densenet121" });

    let (_, first) = post_predict!(app, request.clone());
    let (_, second) = post_predict!(app, request);
    assert_eq!(first, second);
}

#[actix_web::test]
async fn missing_image_is_a_client_error() {
    let app = app!(full_registry());
    let (status, body) = post_predict!(app, json!({ "model": "cnn" }));

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "error": "Missing image or model parameter" }));
}

#[actix_web::test]
async fn missing_model_is_a_client_error() {
    let app = app!(full_registry());
    let (status, body) = post_predict!(app, json!({ "image": "AAAA" }));

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing image or model parameter");
}

#[actix_web::test]
async fn unknown_model_never_reaches_inference() {
    // An empty registry would answer 500 if the selector got that far.
    let app = app!(ModelRegistry::empty());
    let (status, body) = post_predict!(app, json!({ "image": "AAAA", "model": "vgg16" }));

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "error": "Invalid model name" }));
}

#[actix_web::test]
async fn unloaded_model_is_unavailable_and_unhealthy() {
    let registry = ModelRegistry::empty()
        .with_model(ModelKind::Cnn, Arc::new(Peaked { class: 0, expected_channels: 1 }));
    let app = app!(registry);

    let (status, body) = post_predict!(
        app,
        json!({ "image": png_data_url(&stroke_image()), "model": "densenet121" })
    );
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("is not available"));

    let req = test::TestRequest::get().uri("/health").to_request();
    let health: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        health,
        json!({
            "status": "healthy",
            "models_loaded": { "cnn": true, "resnet50": false, "densenet121": false }
        })
    );
}

#[actix_web::test]
async fn availability_is_checked_before_decoding() {
    let app = app!(ModelRegistry::empty());
    let (status, _) = post_predict!(app, json!({ "image": "%%%", "model": "cnn" }));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn undecodable_image_is_a_client_error() {
    let app = app!(full_registry());

    for image in ["not-base64!!", "data:image/png;base64,aGVsbG8=", "data:image/png;base64,iVBORw0KGgo="] {
        let (status, body) = post_predict!(app, json!({ "image": image, "model": "cnn" }));
        assert_eq!(status, StatusCode::BAD_REQUEST, "{image}");
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("Error decoding image"));
    }
}

#[actix_web::test]
async fn inference_failures_do_not_leak_detail() {
    let registry = ModelRegistry::empty().with_model(ModelKind::Cnn, Arc::new(Failing));
    let app = app!(registry);

    let (status, body) =
        post_predict!(app, json!({ "image": png_data_url(&stroke_image()), "model": "cnn" }));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "success": false, "error": "Internal server error during prediction" })
    );
}

#[actix_web::test]
async fn malformed_json_is_rejected() {
    let app = app!(full_registry());
    let req = test::TestRequest::post()
        .uri("/predict")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn oversized_body_is_rejected() {
    let app = app!(full_registry(), 1024 * 1024);
    let image = "A".repeat(2 * 1024 * 1024);

    let (status, body) = post_predict!(app, json!({ "image": image, "model": "cnn" }));
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        body,
        json!({ "success": false, "error": "File too large. Maximum size is 1MB." })
    );
}

#[actix_web::test]
async fn unknown_route_is_json_404() {
    let app = app!(full_registry());
    let req = test::TestRequest::get().uri("/nope").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "success": false, "error": "Endpoint not found" }));
}

#[actix_web::test]
async fn index_serves_the_drawing_page() {
    let app = app!(ModelRegistry::empty());
    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
    let body = test::read_body(resp).await;
    assert!(std::str::from_utf8(&body).unwrap().contains("/predict"));
}
