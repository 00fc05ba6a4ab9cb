//! Turns raw glyph coverage into padded, optionally outlined tiles.

use crate::blend::{blit_copy, blit_over, scale_rgb, subtract_alpha};
use crate::raster::{GlyphBitmap, GlyphMetrics, Rasterizer};
use crate::settings::GlyphStyle;
use fondant_config::Color;
use image::RgbaImage;

/// One character's packing unit: glyph plus outline plus padding.
#[derive(Debug, Clone)]
pub struct GlyphTile {
    pub ch: char,
    pub image: RgbaImage,
    /// Straight from the backend; padding and border are not folded in.
    pub metrics: GlyphMetrics,
}

impl GlyphTile {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Build the tile for `ch`, or `None` if the backend has no glyph for it.
pub fn composite_glyph<R: Rasterizer + ?Sized>(
    rasterizer: &R,
    ch: char,
    style: &GlyphStyle,
) -> Option<GlyphTile> {
    let bitmap = rasterizer.rasterize(ch)?;
    Some(GlyphTile {
        ch,
        image: compose_tile(&bitmap, style),
        metrics: bitmap.metrics,
    })
}

fn compose_tile(bitmap: &GlyphBitmap, style: &GlyphStyle) -> RgbaImage {
    let pad = style.padding;
    let border = style.border;

    let mut glyph = bitmap.paint(style.color);
    scale_rgb(&mut glyph, style.color.alpha());

    let width = bitmap.width + pad.horizontal() + 2 * border;
    let height = bitmap.height + pad.vertical() + 2 * border;
    let mut tile = RgbaImage::new(width, height);

    if border == 0 {
        blit_copy(&mut tile, &glyph, pad.left, pad.top);
        return tile;
    }

    let outline = outline_layer(bitmap, style, width, height);
    blit_over(&mut tile, &outline, 0, 0);
    blit_over(&mut tile, &glyph, pad.left + border, pad.top + border);
    tile
}

/// The outline ring: the glyph dilated by a disk of radius `border`, with
/// the glyph itself punched out.
fn outline_layer(bitmap: &GlyphBitmap, style: &GlyphStyle, width: u32, height: u32) -> RgbaImage {
    let pad = style.padding;
    let border = style.border;
    let radius = i64::from(border);

    let stamp = bitmap.paint(style.border_color);
    let mut layer = RgbaImage::new(width, height);

    for a in 0..2 * border + 2 {
        for b in 0..2 * border + 2 {
            let dx = i64::from(a) - radius;
            let dy = i64::from(b) - radius;
            if dx * dx + dy * dy >= radius * radius {
                continue;
            }
            blit_over(&mut layer, &stamp, pad.left + a, pad.top + b);
        }
    }

    let mask = bitmap.paint(Color::WHITE);
    subtract_alpha(&mut layer, &mask, pad.left + border, pad.top + border);
    scale_rgb(&mut layer, style.border_color.alpha());
    layer
}

/// Composite every character, returning the tiles and the characters the
/// backend could not render.
pub fn composite_all<R, I, F>(
    rasterizer: &R,
    chars: I,
    style: &GlyphStyle,
    mut on_glyph: F,
) -> (Vec<GlyphTile>, Vec<char>)
where
    R: Rasterizer + ?Sized,
    I: IntoIterator<Item = char>,
    F: FnMut(char),
{
    let mut tiles = Vec::new();
    let mut removed = Vec::new();
    for ch in chars {
        match composite_glyph(rasterizer, ch, style) {
            Some(tile) => tiles.push(tile),
            None => removed.push(ch),
        }
        on_glyph(ch);
    }
    (tiles, removed)
}
