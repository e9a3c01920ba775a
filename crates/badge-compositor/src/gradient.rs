//! Background band fills: flat tint and horizontal two-color gradient.

use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::error::{CompositeError, Result};

/// Build a horizontal gradient from `start` (x = 0) to `end` (x = width - 1).
///
/// R, G, B and alpha are interpolated independently with
/// `ratio = x / (width - 1)` (0 for a one-pixel-wide band); every row is
/// identical. The interpolated alpha is then scaled by `opacity`
/// (clamped to `0.0..=1.0`).
pub fn horizontal_gradient(
    width: u32,
    height: u32,
    start: Rgba<u8>,
    end: Rgba<u8>,
    opacity: f32,
) -> Result<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(CompositeError::invalid_image(format!(
            "gradient of zero size ({width}x{height})"
        )));
    }
    debug!(width, height, ?start, ?end, opacity, "Building horizontal gradient");

    let opacity = opacity.clamp(0.0, 1.0);
    let row: Vec<Rgba<u8>> = (0..width)
        .map(|x| {
            let ratio = if width == 1 {
                0.0
            } else {
                x as f32 / (width - 1) as f32
            };
            let mut px = Rgba([
                lerp(start[0], end[0], ratio),
                lerp(start[1], end[1], ratio),
                lerp(start[2], end[2], ratio),
                lerp(start[3], end[3], ratio),
            ]);
            px[3] = (f32::from(px[3]) * opacity).round() as u8;
            px
        })
        .collect();

    Ok(RgbaImage::from_fn(width, height, |x, _| row[x as usize]))
}

/// Fill a band with a single RGBA constant.
pub fn flat_tint(width: u32, height: u32, color: Rgba<u8>) -> Result<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(CompositeError::invalid_image(format!(
            "tint of zero size ({width}x{height})"
        )));
    }
    Ok(RgbaImage::from_pixel(width, height, color))
}

fn lerp(a: u8, b: u8, t: f32) -> u8 {
    let (a, b) = (f32::from(a), f32::from(b));
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 64]);

    #[test]
    fn test_gradient_endpoints_match_colors() {
        let g = horizontal_gradient(17, 3, RED, BLUE, 1.0).unwrap();
        assert_eq!(*g.get_pixel(0, 0), RED);
        assert_eq!(*g.get_pixel(16, 0), BLUE);
        assert_eq!(*g.get_pixel(16, 2), BLUE);
    }

    #[test]
    fn test_gradient_is_monotonic_per_channel() {
        let g = horizontal_gradient(100, 1, RED, BLUE, 1.0).unwrap();
        for x in 1..100 {
            let prev = g.get_pixel(x - 1, 0);
            let cur = g.get_pixel(x, 0);
            assert!(cur[0] <= prev[0], "red must not increase at x={x}");
            assert!(cur[1] == prev[1]);
            assert!(cur[2] >= prev[2], "blue must not decrease at x={x}");
            assert!(cur[3] <= prev[3], "alpha must not increase at x={x}");
        }
    }

    #[test]
    fn test_gradient_rows_are_identical() {
        let g = horizontal_gradient(9, 5, RED, BLUE, 1.0).unwrap();
        for y in 1..5 {
            for x in 0..9 {
                assert_eq!(g.get_pixel(x, y), g.get_pixel(x, 0));
            }
        }
    }

    #[test]
    fn test_gradient_single_column_uses_start_color() {
        let g = horizontal_gradient(1, 4, RED, BLUE, 1.0).unwrap();
        assert_eq!(*g.get_pixel(0, 3), RED);
    }

    #[test]
    fn test_gradient_opacity_scales_alpha() {
        let g = horizontal_gradient(2, 1, RED, RED, 0.5).unwrap();
        assert_eq!(g.get_pixel(0, 0)[3], 128);
        assert_eq!(g.get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn test_gradient_rejects_zero_size() {
        assert!(horizontal_gradient(0, 4, RED, BLUE, 1.0).is_err());
        assert!(horizontal_gradient(4, 0, RED, BLUE, 1.0).is_err());
    }

    #[test]
    fn test_flat_tint_fills_every_pixel() {
        let tint = Rgba([0, 0, 0, 128]);
        let band = flat_tint(5, 2, tint).unwrap();
        assert!(band.pixels().all(|p| *p == tint));
        assert!(flat_tint(0, 2, tint).is_err());
    }
}
