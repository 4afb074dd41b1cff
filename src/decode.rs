//! Decodes the base64 image payload posted by clients.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageReader};

use crate::error::PredictError;

/// Strips an optional data-URL header (`data:image/png;base64,`).
///
/// Keeps the text after the first comma, up to the next one if present.
pub fn strip_data_url(payload: &str) -> &str {
    match payload.split_once(',') {
        Some((_, rest)) => rest.split(',').next().unwrap_or(rest),
        None => payload,
    }
}

/// Decodes a base64 (optionally data-URL prefixed) image into RGB pixels.
pub fn decode_image(payload: &str) -> Result<DynamicImage, PredictError> {
    let encoded = strip_data_url(payload).trim();
    let bytes = STANDARD.decode(encoded).map_err(PredictError::decode)?;

    let image = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(PredictError::decode)?
        .decode()
        .map_err(PredictError::decode)?;

    Ok(DynamicImage::ImageRgb8(image.to_rgb8()))
}
