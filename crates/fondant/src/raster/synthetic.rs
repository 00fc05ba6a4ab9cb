//! A font-free backend that draws every glyph as a solid rectangle.
//!
//! Useful wherever a real font file would make results depend on the font:
//! metrics, kerning and coverage are exactly what was configured.

use super::{GlyphBitmap, GlyphMetrics, Rasterizer};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticGlyph {
    pub width: u32,
    pub height: u32,
    pub min_x: i64,
    pub min_y: i64,
    pub advance: f32,
}

impl SyntheticGlyph {
    pub fn new(width: u32, height: u32, advance: f32) -> Self {
        Self {
            width,
            height,
            min_x: 0,
            min_y: 0,
            advance,
        }
    }

    pub fn with_bearing(mut self, min_x: i64, min_y: i64) -> Self {
        self.min_x = min_x;
        self.min_y = min_y;
        self
    }
}

#[derive(Debug, Clone)]
pub struct SyntheticRasterizer {
    face_name: String,
    size: u32,
    line_height: i32,
    glyphs: BTreeMap<char, SyntheticGlyph>,
    kerning: HashMap<(char, char), f32>,
}

impl SyntheticRasterizer {
    pub fn new(size: u32, line_height: i32) -> Self {
        Self {
            face_name: "Synthetic".to_string(),
            size,
            line_height,
            glyphs: BTreeMap::new(),
            kerning: HashMap::new(),
        }
    }

    pub fn with_glyph(mut self, ch: char, glyph: SyntheticGlyph) -> Self {
        self.glyphs.insert(ch, glyph);
        self
    }

    /// Give every character in `chars` the same box.
    pub fn with_glyphs(mut self, chars: &str, glyph: SyntheticGlyph) -> Self {
        for ch in chars.chars() {
            self.glyphs.insert(ch, glyph);
        }
        self
    }

    pub fn with_kerning(mut self, first: char, second: char, amount: f32) -> Self {
        self.kerning.insert((first, second), amount);
        self
    }
}

impl Rasterizer for SyntheticRasterizer {
    fn face_name(&self) -> &str {
        &self.face_name
    }

    fn pixel_size(&self) -> u32 {
        self.size
    }

    fn line_height(&self) -> i32 {
        self.line_height
    }

    fn rasterize(&self, ch: char) -> Option<GlyphBitmap> {
        let glyph = self.glyphs.get(&ch)?;
        Some(GlyphBitmap {
            width: glyph.width,
            height: glyph.height,
            coverage: vec![u8::MAX; (glyph.width * glyph.height) as usize],
            metrics: GlyphMetrics {
                min_x: glyph.min_x,
                max_x: glyph.min_x + i64::from(glyph.width),
                min_y: glyph.min_y,
                max_y: glyph.min_y + i64::from(glyph.height),
                advance: glyph.advance,
            },
        })
    }

    fn advance(&self, ch: char) -> f32 {
        self.glyphs.get(&ch).map_or(0.0, |g| g.advance)
    }

    fn sequence_advance(&self, first: char, second: char) -> f32 {
        let kern = self.kerning.get(&(first, second)).copied().unwrap_or(0.0);
        self.advance(first) + self.advance(second) + kern
    }
}
