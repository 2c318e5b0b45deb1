//! QR artifact rendering
//!
//! Encodes a URL as a QR code and renders it to an in-memory PNG at the
//! requested dimension. Rendering is CPU-bound and is run on the blocking
//! pool by the runtime adapter.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Luma};
use qrcode::QrCode;
use std::time::Duration;
use thiserror::Error;

/// Why an artifact could not be produced.
#[derive(Debug, Clone, Error)]
pub enum GenerateError {
    #[error("QR encoding failed: {0}")]
    Encode(String),
    #[error("PNG rendering failed: {0}")]
    Render(String),
    #[error("generation timed out after {0:?}")]
    TimedOut(Duration),
    #[error("generation task failed: {0}")]
    Task(String),
}

/// Render `url` as a QR code PNG at least `pixel` wide.
///
/// The rendered image is the smallest module-aligned size at or above the
/// requested dimension.
pub fn render_qr_png(url: &str, pixel: u32) -> Result<Vec<u8>, GenerateError> {
    let code = QrCode::new(url.as_bytes()).map_err(|e| GenerateError::Encode(e.to_string()))?;
    let img = code
        .render::<Luma<u8>>()
        .min_dimensions(pixel, pixel)
        .build();

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::L8)
        .map_err(|e| GenerateError::Render(e.to_string()))?;
    Ok(png)
}
