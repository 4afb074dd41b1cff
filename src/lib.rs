//! Handwritten Bangla grapheme recognition served over HTTP.
//!
//! A request carries a base64 image and the name of one of three models.
//! The image is decoded, normalized to the input the model was trained on,
//! classified with ONNX Runtime and answered with the predicted glyph and
//! its confidence.

pub mod config;
pub mod decode;
pub mod dispatch;
pub mod error;
pub mod inference;
pub mod labels;
pub mod model;
pub mod preprocess;
pub mod registry;
pub mod server;

pub use error::PredictError;
pub use model::ModelKind;
pub use registry::ModelRegistry;

/// Installs the global tracing subscriber.
///
/// Honors `RUST_LOG`; falls back to `info` when it is unset.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
