//! Aspect-ratio-preserving resize using Lanczos3 filtering.

use image::RgbaImage;
use image::imageops::{self, FilterType};
use tracing::debug;

/// Width that keeps the aspect ratio of a `width`x`height` image scaled to `target_height`.
///
/// Computed as `round(width * target_height / height)`, never below 1.
pub fn scaled_width(width: u32, height: u32, target_height: u32) -> u32 {
    if height == 0 {
        return 1;
    }
    let w = (f64::from(width) * f64::from(target_height) / f64::from(height)).round() as u32;
    w.max(1)
}

/// Resize an image to a target height while maintaining aspect ratio.
///
/// Returns a copy of the original if it already matches the target height.
pub fn resize_to_height(img: &RgbaImage, height: u32) -> RgbaImage {
    let (orig_w, orig_h) = img.dimensions();
    let height = height.max(1);

    if orig_h == height {
        debug!(height, "Image already at target height, skipping resize");
        return img.clone();
    }

    let new_width = scaled_width(orig_w, orig_h, height);

    debug!(
        orig_w,
        orig_h,
        new_width,
        new_height = height,
        "Resizing image to target height"
    );

    imageops::resize(img, new_width, height, FilterType::Lanczos3)
}
