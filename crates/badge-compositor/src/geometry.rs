//! Square cropping and circular alpha masks.

use image::{GrayImage, Luma, RgbaImage, imageops};
use tracing::debug;

use crate::error::{CompositeError, Result};

/// Samples per axis used for boundary pixels of the circular mask.
const MASK_SUPERSAMPLE: u32 = 4;

/// Crop the centered square region of an image.
///
/// The side is `min(width, height)`; the region is centered on both axes
/// (odd remainders round towards the top-left). Square inputs are returned
/// unchanged.
pub fn square_crop(img: &RgbaImage) -> Result<RgbaImage> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(CompositeError::invalid_image(format!(
            "zero dimension ({width}x{height})"
        )));
    }

    if width == height {
        debug!(size = width, "Image already square, skipping crop");
        return Ok(img.clone());
    }

    let size = width.min(height);
    let x = (width - size) / 2;
    let y = (height - size) / 2;
    debug!(width, height, size, x, y, "Cropping to centered square");

    Ok(imageops::crop_imm(img, x, y, size, size).to_image())
}

/// Build an anti-aliased mask for the circle inscribed in a `size`x`size` square.
///
/// Pixels well inside the circle are 255, pixels well outside are 0. Pixels
/// straddling the edge get their coverage from a fixed 4x4 sample grid, so
/// the same size always yields the same mask.
pub fn circular_mask(size: u32) -> GrayImage {
    let center = f64::from(size) / 2.0;
    let radius = center;
    let r2 = radius * radius;
    // Half the pixel diagonal: beyond this band the whole pixel is on one side.
    let edge = std::f64::consts::FRAC_1_SQRT_2;

    GrayImage::from_fn(size, size, |x, y| {
        let dx = f64::from(x) + 0.5 - center;
        let dy = f64::from(y) + 0.5 - center;
        let dist = (dx * dx + dy * dy).sqrt();

        if dist <= radius - edge {
            return Luma([255]);
        }
        if dist >= radius + edge {
            return Luma([0]);
        }

        let step = 1.0 / f64::from(MASK_SUPERSAMPLE);
        let mut inside = 0u32;
        for sy in 0..MASK_SUPERSAMPLE {
            for sx in 0..MASK_SUPERSAMPLE {
                let px = f64::from(x) + (f64::from(sx) + 0.5) * step - center;
                let py = f64::from(y) + (f64::from(sy) + 0.5) * step - center;
                if px * px + py * py <= r2 {
                    inside += 1;
                }
            }
        }
        let samples = MASK_SUPERSAMPLE * MASK_SUPERSAMPLE;
        Luma([((inside * 255 + samples / 2) / samples) as u8])
    })
}

/// Gate an image's alpha channel with a mask.
///
/// Each alpha becomes `min(alpha, mask)`, so applying the same mask again is
/// a no-op and already transparent pixels stay transparent.
pub fn apply_mask(img: &mut RgbaImage, mask: &GrayImage) -> Result<()> {
    if img.dimensions() != mask.dimensions() {
        return Err(CompositeError::invalid_image(format!(
            "mask is {:?} but image is {:?}",
            mask.dimensions(),
            img.dimensions()
        )));
    }

    for (pixel, m) in img.pixels_mut().zip(mask.pixels()) {
        pixel[3] = pixel[3].min(m[0]);
    }
    Ok(())
}
