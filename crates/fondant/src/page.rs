//! Atlas page images built from a packed layout.

use crate::blend::{blit_over, premultiply};
use crate::glyph::GlyphTile;
use crate::pack::PackedLayout;
use fondant_config::Color;
use image::{Rgba, RgbaImage};

/// Draw every placed tile onto background-filled pages, in page order.
///
/// Premultiplication runs last, over whole pages, because tile compositing
/// works in straight alpha.
pub fn compose_pages(
    layout: &PackedLayout,
    tiles: &[GlyphTile],
    background: Color,
    premultiplied: bool,
) -> Vec<RgbaImage> {
    let mut pages: Vec<RgbaImage> = (0..layout.page_count)
        .map(|_| RgbaImage::from_pixel(layout.width, layout.height, Rgba(background.0)))
        .collect();

    for (tile, placement) in tiles.iter().zip(&layout.placements) {
        let page = &mut pages[(placement.page - 1) as usize];
        blit_over(page, &tile.image, placement.x, placement.y);
    }

    if premultiplied {
        for page in &mut pages {
            premultiply(page);
        }
    }

    pages
}
