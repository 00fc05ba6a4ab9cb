//! Glyph rasterization backends.
//!
//! The pipeline only talks to [`Rasterizer`], so any font library that can
//! produce a coverage mask, horizontal metrics and a pair advance can be used.

mod fontdue;
pub mod synthetic;

pub use self::fontdue::FontdueRasterizer;
pub use synthetic::{SyntheticGlyph, SyntheticRasterizer};

use fondant_config::Color;
use image::{Rgba, RgbaImage};

/// Per-glyph metrics in pixels, y axis pointing up from the baseline.
///
/// Bearings are wide integers because some backends hand back 32-bit
/// unsigned values for quantities that are really negative; the descriptor
/// emitter reinterprets those.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    pub min_x: i64,
    pub max_x: i64,
    pub min_y: i64,
    pub max_y: i64,
    pub advance: f32,
}

/// Coverage mask of one glyph, row-major, one byte per pixel.
#[derive(Debug, Clone)]
pub struct GlyphBitmap {
    pub width: u32,
    pub height: u32,
    pub coverage: Vec<u8>,
    pub metrics: GlyphMetrics,
}

impl GlyphBitmap {
    /// Render the mask in `color` over a transparent background.
    ///
    /// The result is straight alpha: RGB is the color, alpha is the coverage.
    /// The color's own alpha is not applied here.
    pub fn paint(&self, color: Color) -> RgbaImage {
        let [r, g, b, _] = color.0;
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let a = self.coverage[(y * self.width + x) as usize];
            Rgba([r, g, b, a])
        })
    }
}

pub trait Rasterizer {
    /// Family name written into the descriptor
    fn face_name(&self) -> &str;

    /// Pixel size the backend renders at
    fn pixel_size(&self) -> u32;

    /// Distance between baselines, before any configured spacing
    fn line_height(&self) -> i32;

    /// `None` when the font has no glyph for `ch`.
    fn rasterize(&self, ch: char) -> Option<GlyphBitmap>;

    fn advance(&self, ch: char) -> f32;

    /// Advance of `first` immediately followed by `second`, including any
    /// pair adjustment the font applies.
    fn sequence_advance(&self, first: char, second: char) -> f32;
}

/// Snap coverage to fully on or off.
pub(crate) fn threshold(coverage: &mut [u8]) {
    for value in coverage {
        *value = if *value >= 128 { u8::MAX } else { 0 };
    }
}
