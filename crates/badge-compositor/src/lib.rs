//! Numbered badge compositing.
//!
//! Crops a photo to a square (optionally a circle), blends an optional
//! tinted band over its bottom 30%, stamps a per-number overlay graphic (or
//! a synthesized number when no graphic exists) on top, and encodes the
//! result as PNG.

pub mod compose;
pub mod compositor;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod gradient;
pub mod overlay;
pub mod resize;
pub mod store;
pub mod text;

// Re-exports for convenience
pub use compositor::{BackgroundStyle, CompositeRequest, CompositeResult, Compositor};
pub use encode::{decode, encode_png};
pub use error::{CompositeError, Result};
pub use geometry::{apply_mask, circular_mask, square_crop};
pub use gradient::{flat_tint, horizontal_gradient};
pub use overlay::{IDENTIFIER_RANGE, OverlayResolver, band_height};
pub use resize::resize_to_height;
pub use store::{DirectoryStore, MemoryStore, OverlayStore};
pub use text::{BitmapRenderer, FontRenderer, GlyphRenderer, renderer_from_font_bytes};
