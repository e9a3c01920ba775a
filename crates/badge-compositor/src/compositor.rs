//! Badge composition: crop, mask, tint band, overlay, encode.
//!
//! Stage order is fixed for every mode:
//!
//! ```text
//! crop to square
//!   -> circle mask on the photo        (circular mode)
//!   -> tint band, gated by the mask    (tinted mode)
//!   -> overlay
//!   -> final clamp: re-apply the mask  (circular mode)
//!                   or flatten opaque  (square mode)
//! ```
//!
//! The final clamp clips overlay corners to the circle, so nothing outside
//! the circle is ever visible in circular mode.

use image::{GrayImage, Rgba, RgbaImage, imageops};
use tracing::{debug, info};

use crate::compose::{blend_pixel, overlay};
use crate::encode::encode_png;
use crate::error::{CompositeError, Result};
use crate::geometry::{apply_mask, circular_mask, square_crop};
use crate::gradient::{flat_tint, horizontal_gradient};
use crate::overlay::{OverlayResolver, band_height};

/// Default flat tint: half-transparent black.
pub const DEFAULT_TINT: Rgba<u8> = Rgba([0, 0, 0, 128]);

const OPAQUE_BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// One badge to produce.
#[derive(Debug, Clone)]
pub struct CompositeRequest {
    pub source: RgbaImage,
    /// Overlay identifier, expected in 1..=999.
    pub identifier: u32,
    /// Circle badge when true, plain square ("facebook" mode) when false.
    pub circular: bool,
    /// Blend a tinted band beneath the overlay.
    pub tinted_background: bool,
}

/// Final composite plus its PNG encoding.
#[derive(Debug, Clone)]
pub struct CompositeResult {
    pub image: RgbaImage,
    pub png: Vec<u8>,
}

impl CompositeResult {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// How the tinted band is filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundStyle {
    Flat(Rgba<u8>),
    Gradient {
        start: Rgba<u8>,
        end: Rgba<u8>,
        opacity: f32,
    },
}

impl Default for BackgroundStyle {
    fn default() -> Self {
        Self::Flat(DEFAULT_TINT)
    }
}

impl BackgroundStyle {
    fn render(&self, width: u32, height: u32) -> Result<RgbaImage> {
        match *self {
            Self::Flat(color) => flat_tint(width, height, color),
            Self::Gradient {
                start,
                end,
                opacity,
            } => horizontal_gradient(width, height, start, end, opacity),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Circle,
    Square,
}

/// Strategy selected from the request flags.
#[derive(Debug, Clone, Copy)]
struct Plan {
    shape: Shape,
    background: Option<BackgroundStyle>,
}

/// Produces badges. Holds no per-request state, so one instance can serve
/// many threads at once.
#[derive(Clone)]
pub struct Compositor {
    resolver: OverlayResolver,
    background: BackgroundStyle,
}

impl Compositor {
    pub fn new(resolver: OverlayResolver) -> Self {
        Self {
            resolver,
            background: BackgroundStyle::default(),
        }
    }

    /// Builder: set the style used when a request asks for a tinted band.
    pub fn with_background(mut self, background: BackgroundStyle) -> Self {
        self.background = background;
        self
    }

    pub fn background(&self) -> BackgroundStyle {
        self.background
    }

    fn plan(&self, request: &CompositeRequest) -> Plan {
        Plan {
            shape: if request.circular {
                Shape::Circle
            } else {
                Shape::Square
            },
            background: request.tinted_background.then_some(self.background),
        }
    }

    /// Build the composite image without encoding it.
    pub fn compose(&self, request: &CompositeRequest) -> Result<RgbaImage> {
        let plan = self.plan(request);

        let mut img = square_crop(&request.source)?;
        let side = img.width();
        let band = band_height(side);
        if band == 0 {
            return Err(CompositeError::invalid_image(format!(
                "{side}px square is too small for an overlay band"
            )));
        }
        let band_y = side - band;
        debug!(side, band, ?plan, "Cropped source");

        let mask = match plan.shape {
            Shape::Circle => {
                let mask = circular_mask(side);
                apply_mask(&mut img, &mask)?;
                Some(mask)
            }
            Shape::Square => None,
        };

        if let Some(style) = plan.background {
            let mut tint = style.render(side, band)?;
            if let Some(mask) = &mask {
                let band_mask: GrayImage =
                    imageops::crop_imm(mask, 0, band_y, side, band).to_image();
                apply_mask(&mut tint, &band_mask)?;
            }
            overlay(&mut img, &tint, 0, i64::from(band_y));
            debug!(?style, "Blended background band");
        }

        let badge = self.resolver.resolve(request.identifier, side, side)?;
        let x = (i64::from(side) - i64::from(badge.width())) / 2;
        let y = i64::from(side) - i64::from(badge.height());
        overlay(&mut img, &badge, x, y);
        debug!(
            identifier = request.identifier,
            overlay_w = badge.width(),
            overlay_h = badge.height(),
            x,
            y,
            "Blended overlay"
        );

        match &mask {
            Some(mask) => apply_mask(&mut img, mask)?,
            None => flatten_opaque(&mut img),
        }

        Ok(img)
    }

    /// Compose and encode one request.
    ///
    /// Either the full result is returned or an error; there is no partial output.
    pub fn process(&self, request: CompositeRequest) -> Result<CompositeResult> {
        let image = self.compose(&request)?;
        let png = encode_png(&image)?;

        info!(
            identifier = request.identifier,
            circular = request.circular,
            tinted = request.tinted_background,
            width = image.width(),
            height = image.height(),
            bytes = png.len(),
            "Badge composed"
        );
        Ok(CompositeResult { image, png })
    }
}

/// Put every pixel over opaque black so the square badge has no holes.
fn flatten_opaque(img: &mut RgbaImage) {
    for pixel in img.pixels_mut() {
        if pixel[3] != 255 {
            *pixel = blend_pixel(&OPAQUE_BLACK, pixel);
        }
    }
}
