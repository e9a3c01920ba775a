//! PNG encoding of composites and decoding of uploaded photos.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use tracing::debug;

use crate::error::{CompositeError, Result};

/// Encode an RGBA image as PNG.
///
/// Compression and filter settings are fixed, so equal pixels always
/// produce equal bytes and decode-then-encode reproduces the input stream.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let (width, height) = img.dimensions();
    let mut out = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut out, CompressionType::Default, FilterType::Adaptive);
    encoder
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
        .map_err(|e| CompositeError::Encoding(e.to_string()))?;

    debug!(width, height, bytes = out.len(), "Encoded PNG");
    Ok(out)
}

/// Decode any supported raster format into RGBA.
pub fn decode(data: &[u8]) -> Result<RgbaImage> {
    let img = image::load_from_memory(data)
        .map_err(|e| CompositeError::invalid_image(e.to_string()))?
        .to_rgba8();
    if img.width() == 0 || img.height() == 0 {
        return Err(CompositeError::invalid_image(format!(
            "decoded image has zero dimension ({}x{})",
            img.width(),
            img.height()
        )));
    }
    Ok(img)
}
