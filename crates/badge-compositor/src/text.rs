//! Text rendering for synthesized overlays.
//!
//! Rendering goes through the [`GlyphRenderer`] capability so callers can
//! inject a scalable font when one is installed. [`BitmapRenderer`] is the
//! built-in fallback and needs no font file at all.

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use tracing::warn;

use crate::compose::blend_pixel;

/// Something that can measure and draw a line of text onto an RGBA canvas.
pub trait GlyphRenderer: Send + Sync {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Width and height of the box `text` occupies at pixel size `px`.
    fn measure(&self, text: &str, px: f32) -> (u32, u32);

    /// Draw `text` with the top-left of its box at (`x`, `y`).
    fn draw(&self, canvas: &mut RgbaImage, x: i32, y: i32, px: f32, text: &str, color: Rgba<u8>);
}

/// Draw text centered on both axes of the canvas.
pub fn draw_centered_text(
    canvas: &mut RgbaImage,
    renderer: &dyn GlyphRenderer,
    px: f32,
    text: &str,
    color: Rgba<u8>,
) {
    let (text_w, text_h) = renderer.measure(text, px);
    let x = (canvas.width() as i32 - text_w as i32) / 2;
    let y = (canvas.height() as i32 - text_h as i32) / 2;
    renderer.draw(canvas, x, y, px, text, color);
}

/// Pick a renderer for optional font bytes.
///
/// Falls back to [`BitmapRenderer`] when no font is given or the data does
/// not parse as a TTF/OTF font.
pub fn renderer_from_font_bytes(data: Option<Vec<u8>>) -> Box<dyn GlyphRenderer> {
    match data.map(FontRenderer::from_bytes) {
        Some(Ok(font)) => Box::new(font),
        Some(Err(e)) => {
            warn!("Font could not be parsed ({e}), using built-in bitmap digits");
            Box::new(BitmapRenderer)
        }
        None => Box::new(BitmapRenderer),
    }
}

/// Scalable font rendering backed by `ab_glyph`.
pub struct FontRenderer {
    font: FontVec,
}

impl FontRenderer {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, ab_glyph::InvalidFont> {
        Ok(Self {
            font: FontVec::try_from_vec(data)?,
        })
    }
}

impl GlyphRenderer for FontRenderer {
    fn name(&self) -> &'static str {
        "font"
    }

    fn measure(&self, text: &str, px: f32) -> (u32, u32) {
        let scale = PxScale::from(px);
        (
            measure_text_width(&self.font, scale, text),
            line_height(&self.font, scale),
        )
    }

    /// Glyph coverage is rasterized into a separate mask first and then
    /// becomes the text alpha; the color channels stay the requested color.
    fn draw(&self, canvas: &mut RgbaImage, x: i32, y: i32, px: f32, text: &str, color: Rgba<u8>) {
        let mut coverage = GrayImage::new(canvas.width(), canvas.height());
        draw_text_mut(&mut coverage, Luma([255]), x, y, PxScale::from(px), &self.font, text);

        let [r, g, b, a] = color.0;
        for (cov, pixel) in coverage.pixels().zip(canvas.pixels_mut()) {
            if cov[0] == 0 {
                continue;
            }
            let alpha = ((u16::from(cov[0]) * u16::from(a) + 127) / 255) as u8;
            *pixel = blend_pixel(pixel, &Rgba([r, g, b, alpha]));
        }
    }
}

/// DejaVu Sans Mono, used by tests that need a real scalable font.
#[cfg(test)]
pub(crate) fn test_font() -> FontRenderer {
    match FontRenderer::from_bytes(include_bytes!("../testdata/DejaVuSansMono.ttf").to_vec()) {
        Ok(font) => font,
        Err(e) => panic!("bundled test font must parse: {e}"),
    }
}

/// Measure the pixel width of a string at the given font and scale.
pub fn measure_text_width(font: &impl Font, scale: PxScale, text: &str) -> u32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            width += scaled.kern(prev, glyph_id);
        }
        width += scaled.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    width.ceil() as u32
}

/// Compute the ascent-to-descent height for the given font and scale.
pub fn line_height(font: &impl Font, scale: PxScale) -> u32 {
    let scaled = font.as_scaled(scale);
    (scaled.ascent() - scaled.descent()).ceil() as u32
}

/// Glyph cell width in bitmap units.
const CELL_W: u32 = 5;
/// Glyph cell height in bitmap units.
const CELL_H: u32 = 7;
/// Gap between glyphs in bitmap units.
const CELL_GAP: u32 = 1;

/// 5x7 digit glyphs, one byte per row, bit 4 is the leftmost column.
const DIGITS: [[u8; CELL_H as usize]; 10] = [
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
    [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
];

/// Built-in 5x7 bitmap digits.
///
/// The glyph set is fixed; the requested pixel size only picks an integer
/// block size (`round(px / 8)`, at least 1). Characters other than ASCII
/// digits advance the pen without drawing.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapRenderer;

impl BitmapRenderer {
    fn unit(px: f32) -> u32 {
        ((px / (CELL_H + CELL_GAP) as f32).round() as u32).max(1)
    }
}

impl GlyphRenderer for BitmapRenderer {
    fn name(&self) -> &'static str {
        "bitmap"
    }

    fn measure(&self, text: &str, px: f32) -> (u32, u32) {
        let count = text.chars().count() as u32;
        if count == 0 {
            return (0, 0);
        }
        let unit = Self::unit(px);
        let width = unit * (count * CELL_W + (count - 1) * CELL_GAP);
        (width, unit * CELL_H)
    }

    fn draw(&self, canvas: &mut RgbaImage, x: i32, y: i32, px: f32, text: &str, color: Rgba<u8>) {
        let unit = Self::unit(px) as i32;
        let advance = (CELL_W + CELL_GAP) as i32 * unit;
        let (w, h) = (canvas.width() as i32, canvas.height() as i32);

        for (i, ch) in text.chars().enumerate() {
            let Some(rows) = ch.to_digit(10).map(|d| &DIGITS[d as usize]) else {
                continue;
            };
            let origin_x = x + i as i32 * advance;

            for (row, bits) in rows.iter().enumerate() {
                for col in 0..CELL_W {
                    if bits & (1 << (CELL_W - 1 - col)) == 0 {
                        continue;
                    }
                    let bx = origin_x + col as i32 * unit;
                    let by = y + row as i32 * unit;
                    for cy in by.max(0)..(by + unit).min(h) {
                        for cx in bx.max(0)..(bx + unit).min(w) {
                            let bg = canvas.get_pixel(cx as u32, cy as u32);
                            let out = blend_pixel(bg, &color);
                            canvas.put_pixel(cx as u32, cy as u32, out);
                        }
                    }
                }
            }
        }
    }
}
