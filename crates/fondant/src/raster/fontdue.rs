//! TrueType/OpenType backend: fontdue renders, ttf-parser supplies the family name.

use super::{GlyphBitmap, GlyphMetrics, Rasterizer, threshold};
use crate::error::AtlasError;
use std::path::Path;

/// Rasterizer backed by a TrueType/OpenType file, rendered with fontdue.
pub struct FontdueRasterizer {
    font: ::fontdue::Font,
    face_name: String,
    size: u32,
    px: f32,
    antialiasing: bool,
}

impl FontdueRasterizer {
    pub fn open(path: &Path, size: u32, antialiasing: bool) -> Result<Self, AtlasError> {
        let font_bytes = fs_err::read(path).map_err(|e| AtlasError::Font {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let fallback_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::from_bytes(font_bytes, size, antialiasing, &fallback_name).map_err(|reason| {
            AtlasError::Font {
                path: path.to_path_buf(),
                reason,
            }
        })
    }

    pub fn from_bytes(
        font_bytes: Vec<u8>,
        size: u32,
        antialiasing: bool,
        fallback_name: &str,
    ) -> Result<Self, String> {
        let px = size as f32;
        let face_name = family_name(&font_bytes).unwrap_or_else(|| fallback_name.to_string());

        let settings = ::fontdue::FontSettings {
            scale: px,
            ..::fontdue::FontSettings::default()
        };
        let font = ::fontdue::Font::from_bytes(font_bytes, settings)
            .map_err(|e| format!("failed to parse font: {e}"))?;

        Ok(Self {
            font,
            face_name,
            size,
            px,
            antialiasing,
        })
    }
}

impl Rasterizer for FontdueRasterizer {
    fn face_name(&self) -> &str {
        &self.face_name
    }

    fn pixel_size(&self) -> u32 {
        self.size
    }

    fn line_height(&self) -> i32 {
        self.font
            .horizontal_line_metrics(self.px)
            .map(|lm| lm.ascent - lm.descent)
            .unwrap_or(self.px * 1.2)
            .round() as i32
    }

    fn rasterize(&self, ch: char) -> Option<GlyphBitmap> {
        if self.font.lookup_glyph_index(ch) == 0 {
            return None;
        }

        let (metrics, mut coverage) = self.font.rasterize(ch, self.px);
        if !self.antialiasing {
            threshold(&mut coverage);
        }

        let width = metrics.width as i64;
        let height = metrics.height as i64;
        Some(GlyphBitmap {
            width: metrics.width as u32,
            height: metrics.height as u32,
            coverage,
            metrics: GlyphMetrics {
                min_x: i64::from(metrics.xmin),
                max_x: i64::from(metrics.xmin) + width,
                min_y: i64::from(metrics.ymin),
                max_y: i64::from(metrics.ymin) + height,
                advance: metrics.advance_width,
            },
        })
    }

    fn advance(&self, ch: char) -> f32 {
        self.font.metrics(ch, self.px).advance_width
    }

    fn sequence_advance(&self, first: char, second: char) -> f32 {
        let kern = self
            .font
            .horizontal_kern(first, second, self.px)
            .unwrap_or(0.0);
        self.advance(first) + kern + self.advance(second)
    }
}

/// Family name from the OpenType `name` table, if it has a Unicode entry.
fn family_name(font_bytes: &[u8]) -> Option<String> {
    let face = ttf_parser::Face::parse(font_bytes, 0).ok()?;
    face.names()
        .into_iter()
        .filter(|name| name.name_id == ttf_parser::name_id::FAMILY)
        .find_map(|name| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn serif() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/DejaVuSerif.ttf")
    }

    #[test]
    fn reads_face_name_and_vertical_metrics() {
        let r = FontdueRasterizer::open(&serif(), 32, true).unwrap();

        assert_eq!(r.face_name(), "DejaVu Serif");
        assert_eq!(r.pixel_size(), 32);
        let line_height = r.line_height();
        assert!((33..=42).contains(&line_height), "line height {line_height}");
    }

    #[test]
    fn rasterizes_supported_glyphs_with_matching_advance() {
        let r = FontdueRasterizer::open(&serif(), 32, true).unwrap();
        let glyph = r.rasterize('A').unwrap();

        assert!(glyph.width > 0 && glyph.height > 0);
        assert_eq!(glyph.coverage.len(), (glyph.width * glyph.height) as usize);
        assert_eq!(glyph.metrics.max_x - glyph.metrics.min_x, i64::from(glyph.width));
        assert_eq!(glyph.metrics.advance, r.advance('A'));
        assert!(glyph.coverage.iter().any(|&c| c > 0 && c < u8::MAX));
    }

    #[test]
    fn glyphs_missing_from_the_font_are_unsupported() {
        let r = FontdueRasterizer::open(&serif(), 32, true).unwrap();
        assert!(r.rasterize('漢').is_none());
        assert!(r.rasterize('A').is_some());
    }

    #[test]
    fn aliased_coverage_is_binary() {
        let r = FontdueRasterizer::open(&serif(), 32, false).unwrap();
        let glyph = r.rasterize('O').unwrap();

        assert!(glyph.coverage.iter().all(|&c| c == 0 || c == u8::MAX));
        assert!(glyph.coverage.contains(&u8::MAX));
    }

    #[test]
    fn kerned_pairs_advance_less_than_their_parts() {
        let r = FontdueRasterizer::open(&serif(), 64, true).unwrap();

        let apart = r.advance('A') + r.advance('V');
        assert!(r.sequence_advance('A', 'V') < apart - 1.0);
        let plain = r.advance('H') + r.advance('H');
        assert_eq!(r.sequence_advance('H', 'H'), plain);
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = FontdueRasterizer::from_bytes(b"not a font".to_vec(), 32, true, "x")
            .err()
            .unwrap();
        assert!(err.contains("failed to parse font"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = FontdueRasterizer::open(Path::new("does/not/exist.ttf"), 32, true)
            .err()
            .unwrap();
        assert!(err.to_string().contains("does/not/exist.ttf"));
    }
}
