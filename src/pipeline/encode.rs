//! Image encoding: `DynamicImage` → JPEG bytes.
//!
//! The service only takes JPEG, so a rendered page is flattened to RGB
//! (JPEG has no alpha channel) and encoded at the configured quality.

use crate::error::ScanError;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use tracing::debug;

/// Encode a rendered page as JPEG at `quality` (1–100).
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, ScanError> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .encode_image(&rgb)
        .map_err(|e| ScanError::ConversionFailure {
            detail: format!("JPEG encoding failed: {}", e),
        })?;

    debug!(
        "Encoded {}x{} page → {} bytes JPEG (q={})",
        rgb.width(),
        rgb.height(),
        buf.len(),
        quality
    );
    Ok(buf)
}
