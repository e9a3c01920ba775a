//! Overlay resolution: stored asset when present, synthesized number otherwise.

use std::ops::RangeInclusive;
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::error::{CompositeError, Result};
use crate::resize::resize_to_height;
use crate::store::OverlayStore;
use crate::text::{GlyphRenderer, draw_centered_text};

/// Identifiers the asset store is keyed by. Anything else is treated as "not found".
pub const IDENTIFIER_RANGE: RangeInclusive<u32> = 1..=999;

/// Overlay band height as a percentage of the composite height.
pub const BAND_PERCENT: u64 = 30;

/// Synthesized font size as a percentage of the overlay width.
pub const FONT_PERCENT: u64 = 20;

const TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// `round(len * percent / 100)` in integer arithmetic.
fn percent_of(len: u32, percent: u64) -> u32 {
    ((u64::from(len) * percent + 50) / 100) as u32
}

/// Height of the bottom band shared by the tint and the overlay.
pub fn band_height(height: u32) -> u32 {
    percent_of(height, BAND_PERCENT)
}

/// Resolves the overlay graphic for an identifier.
///
/// Cheap to clone; the store and renderer are shared read-only.
#[derive(Clone)]
pub struct OverlayResolver {
    store: Arc<dyn OverlayStore>,
    glyphs: Arc<dyn GlyphRenderer>,
}

impl OverlayResolver {
    pub fn new(store: Arc<dyn OverlayStore>, glyphs: Arc<dyn GlyphRenderer>) -> Self {
        Self { store, glyphs }
    }

    /// Overlay for `identifier`, sized for a `target_width`x`target_height` composite.
    ///
    /// A stored asset is scaled to the band height keeping its aspect ratio,
    /// so its width may differ from `target_width`. Without an asset a
    /// transparent `target_width`x`band` canvas with the centered number is
    /// returned.
    pub fn resolve(
        &self,
        identifier: u32,
        target_width: u32,
        target_height: u32,
    ) -> Result<RgbaImage> {
        let band = band_height(target_height);
        if target_width == 0 || band == 0 {
            return Err(CompositeError::invalid_image(format!(
                "no room for an overlay on a {target_width}x{target_height} composite"
            )));
        }

        if !IDENTIFIER_RANGE.contains(&identifier) {
            debug!(identifier, "Identifier outside asset range, synthesizing");
            return Ok(self.synthesize(identifier, target_width, band));
        }

        if !self.store.has(identifier) {
            debug!(identifier, "No overlay asset, synthesizing");
            return Ok(self.synthesize(identifier, target_width, band));
        }

        let asset = self.store.load(identifier)?;
        if asset.width() == 0 || asset.height() == 0 {
            return Err(CompositeError::asset(identifier, "asset has zero dimension"));
        }
        debug!(
            identifier,
            asset_w = asset.width(),
            asset_h = asset.height(),
            band,
            "Scaling overlay asset"
        );
        Ok(resize_to_height(&asset, band))
    }

    /// Transparent `width`x`height` canvas with the identifier drawn in white.
    pub fn synthesize(&self, identifier: u32, width: u32, height: u32) -> RgbaImage {
        let mut canvas = RgbaImage::new(width, height);
        let px = percent_of(width, FONT_PERCENT).max(1) as f32;
        draw_centered_text(
            &mut canvas,
            self.glyphs.as_ref(),
            px,
            &identifier.to_string(),
            TEXT_COLOR,
        );
        canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::overlay;
    use crate::store::MemoryStore;
    use crate::text::{BitmapRenderer, test_font};

    struct FailingStore;

    impl OverlayStore for FailingStore {
        fn has(&self, _identifier: u32) -> bool {
            true
        }

        fn load(&self, identifier: u32) -> Result<RgbaImage> {
            Err(CompositeError::asset(identifier, "disk on fire"))
        }
    }

    fn resolver(store: impl OverlayStore + 'static) -> OverlayResolver {
        OverlayResolver::new(Arc::new(store), Arc::new(BitmapRenderer))
    }

    #[test]
    fn band_height_rounds() {
        assert_eq!(band_height(400), 120);
        assert_eq!(band_height(300), 90);
        // 5 * 0.3 = 1.5 rounds up
        assert_eq!(band_height(5), 2);
        assert_eq!(band_height(1), 0);
    }

    #[test]
    fn asset_is_scaled_to_band_keeping_aspect() {
        let asset = RgbaImage::from_pixel(100, 50, Rgba([9, 9, 9, 255]));
        let store = MemoryStore::new().with_asset(12, asset);
        let overlay = resolver(store).resolve(12, 300, 300).unwrap();
        assert_eq!(overlay.dimensions(), (180, 90));
    }

    #[test]
    fn wide_asset_keeps_aspect_even_when_wider_than_target() {
        let store = MemoryStore::new().with_asset(3, RgbaImage::new(1000, 100));
        let overlay = resolver(store).resolve(3, 200, 200).unwrap();
        // band 60 -> 1000 * 60 / 100 = 600
        assert_eq!(overlay.dimensions(), (600, 60));
    }

    #[test]
    fn missing_asset_synthesizes_number() {
        let overlay = resolver(MemoryStore::new()).resolve(7, 400, 400).unwrap();
        assert_eq!(overlay.dimensions(), (400, 120));
        // font 80px -> bitmap unit 10, glyph box 50x70 at (175, 25)
        assert_eq!(*overlay.get_pixel(175, 25), TEXT_COLOR);
        assert_eq!(overlay.get_pixel(0, 0)[3], 0);
        assert_eq!(overlay.get_pixel(174, 25)[3], 0);
    }

    #[test]
    fn font_synthesized_number_is_white_and_keeps_photo_unshaded() {
        let r = OverlayResolver::new(Arc::new(MemoryStore::new()), Arc::new(test_font()));
        let number = r.resolve(7, 400, 400).unwrap();
        assert_eq!(number.dimensions(), (400, 120));

        let drawn: Vec<_> = number.pixels().filter(|p| p[3] > 0).collect();
        assert!(drawn.iter().any(|p| p[3] < 255));
        assert!(drawn.iter().all(|p| [p[0], p[1], p[2]] == [255, 255, 255]));

        let gray = Rgba([200, 200, 200, 255]);
        let mut photo = RgbaImage::from_pixel(400, 120, gray);
        overlay(&mut photo, &number, 0, 0);
        assert!(photo.pixels().all(|p| p[0] >= 200 && p[1] >= 200 && p[2] >= 200));
    }

    #[test]
    fn out_of_range_identifiers_synthesize_without_touching_store() {
        let r = resolver(FailingStore);
        for id in [0, 1000] {
            let overlay = r.resolve(id, 200, 200).unwrap();
            assert_eq!(overlay.dimensions(), (200, 60));
            assert!(overlay.pixels().any(|p| p[3] > 0));
        }
    }

    #[test]
    fn store_failure_propagates() {
        assert!(matches!(
            resolver(FailingStore).resolve(5, 100, 100),
            Err(CompositeError::AssetResolution { identifier: 5, .. })
        ));
    }

    #[test]
    fn zero_band_is_invalid() {
        assert!(matches!(
            resolver(MemoryStore::new()).resolve(1, 1, 1),
            Err(CompositeError::InvalidImage(_))
        ));
    }
}
