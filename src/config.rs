//! Process configuration.

use std::path::PathBuf;

use clap::Parser;

/// Default request body limit: 16 MiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Serves handwritten Bangla grapheme predictions over HTTP.
#[derive(Parser, Debug, Clone)]
#[command(name = "bangla-grapheme-server", version)]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "BANGLA_OCR_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "BANGLA_OCR_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Directory holding cnn_model.onnx, resnet50_model.onnx and densenet121_model.onnx
    #[arg(short, long, env = "BANGLA_OCR_MODELS_DIR", default_value = "models")]
    pub models_dir: PathBuf,

    /// Largest accepted request body in bytes
    #[arg(long, env = "BANGLA_OCR_MAX_BODY", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Number of HTTP worker threads (defaults to the number of CPUs)
    #[arg(short, long, env = "BANGLA_OCR_WORKERS")]
    pub workers: Option<usize>,
}

impl Config {
    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
