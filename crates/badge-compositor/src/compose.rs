//! Alpha compositing of one RGBA layer over another.

use image::{Rgba, RgbaImage};

/// Composite `top` over `base` with its top-left corner at (`x`, `y`).
///
/// Uses straight-alpha "source over": fully opaque source pixels replace the
/// destination, fully transparent ones leave it untouched. Offsets may be
/// negative; whatever falls outside `base` is clipped.
pub fn overlay(base: &mut RgbaImage, top: &RgbaImage, x: i64, y: i64) {
    let (base_w, base_h) = (i64::from(base.width()), i64::from(base.height()));

    for (dx, dy, pixel) in top.enumerate_pixels() {
        let target_x = x + i64::from(dx);
        let target_y = y + i64::from(dy);
        if target_x < 0 || target_y < 0 || target_x >= base_w || target_y >= base_h {
            continue;
        }
        let (tx, ty) = (target_x as u32, target_y as u32);

        match pixel[3] {
            0 => {}
            255 => base.put_pixel(tx, ty, *pixel),
            _ => {
                let bg = base.get_pixel(tx, ty);
                let blended = blend_pixel(bg, pixel);
                base.put_pixel(tx, ty, blended);
            }
        }
    }
}

/// Blend `fg` over `bg`, both with straight (non-premultiplied) alpha.
///
/// Over an opaque background this reduces to `fg * a + bg * (1 - a)`.
pub fn blend_pixel(bg: &Rgba<u8>, fg: &Rgba<u8>) -> Rgba<u8> {
    let fa = f32::from(fg[3]) / 255.0;
    let ba = f32::from(bg[3]) / 255.0;
    let out_a = fa + ba * (1.0 - fa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |i: usize| -> u8 {
        let c = (f32::from(fg[i]) * fa + f32::from(bg[i]) * ba * (1.0 - fa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
