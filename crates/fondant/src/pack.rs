//! Rectangle packing with power-of-two page growth.

use crate::error::AtlasError;
use crate::glyph::GlyphTile;

/// The first candidate page width; the first height is half of it.
pub const MIN_PAGE_SIZE: u32 = 128;

/// Where one tile landed. Pages are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub page: u32,
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedLayout {
    /// Every page shares these dimensions
    pub width: u32,
    pub height: u32,
    pub page_count: u32,
    /// One entry per input tile, in input order
    pub placements: Vec<Placement>,
}

#[derive(Debug, Clone, Copy)]
struct Shelf {
    y: u32,
    height: u32,
    cursor_x: u32,
}

#[derive(Debug)]
struct Bin {
    width: u32,
    height: u32,
    shelves: Vec<Shelf>,
    used_height: u32,
}

impl Bin {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            shelves: Vec::new(),
            used_height: 0,
        }
    }

    /// First shelf with room, else a new shelf below the last one.
    fn insert(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if w > self.width || h > self.height {
            return None;
        }

        for shelf in &mut self.shelves {
            if h <= shelf.height && shelf.cursor_x + w <= self.width {
                let x = shelf.cursor_x;
                shelf.cursor_x += w;
                return Some((x, shelf.y));
            }
        }

        if self.used_height + h > self.height {
            return None;
        }
        let y = self.used_height;
        self.shelves.push(Shelf {
            y,
            height: h,
            cursor_x: w,
        });
        self.used_height += h;
        Some((0, y))
    }
}

/// Pack `tiles` onto pages no larger than `max_size` in either axis.
///
/// Pages start at 128x64 and the smaller side doubles (width on ties) until
/// everything fits on one page. When even a `max_size` square page is not
/// enough, `multipage` spills into as many `max_size` pages as needed;
/// without it the layout is an error.
pub fn pack(
    tiles: &[GlyphTile],
    max_size: u32,
    square: bool,
    multipage: bool,
) -> Result<PackedLayout, AtlasError> {
    if let Some(tile) = tiles
        .iter()
        .find(|t| t.width() > max_size || t.height() > max_size)
    {
        return Err(AtlasError::TileTooLarge {
            ch: tile.ch,
            width: tile.width(),
            height: tile.height(),
            max_size,
        });
    }

    let order = packing_order(tiles);
    let mut width = MIN_PAGE_SIZE.min(max_size);
    let mut height = (width / 2).max(1);

    loop {
        if let Some(spots) = pack_single(tiles, &order, width, height) {
            if square && height < width {
                height = width;
            }
            return Ok(PackedLayout {
                width,
                height,
                page_count: 1,
                placements: spots
                    .into_iter()
                    .map(|(x, y)| Placement { page: 1, x, y })
                    .collect(),
            });
        }

        if height < width {
            height = grow(height, max_size);
        } else if width < max_size {
            width = grow(width, max_size);
        } else {
            break;
        }
    }

    if !multipage {
        return Err(AtlasError::Unpackable {
            count: tiles.len(),
            max_size,
        });
    }

    let (page_count, placements) = pack_multi(tiles, &order, max_size)?;
    Ok(PackedLayout {
        width: max_size,
        height: max_size,
        page_count,
        placements,
    })
}

fn grow(size: u32, max_size: u32) -> u32 {
    size.saturating_mul(2).min(max_size)
}

/// Tallest first, then widest, then input order.
fn packing_order(tiles: &[GlyphTile]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..tiles.len()).collect();
    order.sort_by(|&a, &b| {
        tiles[b]
            .height()
            .cmp(&tiles[a].height())
            .then_with(|| tiles[b].width().cmp(&tiles[a].width()))
            .then_with(|| a.cmp(&b))
    });
    order
}

fn pack_single(
    tiles: &[GlyphTile],
    order: &[usize],
    width: u32,
    height: u32,
) -> Option<Vec<(u32, u32)>> {
    let mut bin = Bin::new(width, height);
    let mut spots = vec![(0, 0); tiles.len()];
    for &i in order {
        spots[i] = bin.insert(tiles[i].width(), tiles[i].height())?;
    }
    Some(spots)
}

fn pack_multi(
    tiles: &[GlyphTile],
    order: &[usize],
    size: u32,
) -> Result<(u32, Vec<Placement>), AtlasError> {
    let mut bins: Vec<Bin> = Vec::new();
    let mut placements = vec![Placement { page: 0, x: 0, y: 0 }; tiles.len()];

    for &i in order {
        let tile = &tiles[i];
        let (w, h) = (tile.width(), tile.height());
        let spot = bins
            .iter_mut()
            .enumerate()
            .find_map(|(index, bin)| bin.insert(w, h).map(|(x, y)| (index, x, y)));

        let (index, x, y) = match spot {
            Some(spot) => spot,
            None => {
                let mut bin = Bin::new(size, size);
                let (x, y) = bin.insert(w, h).ok_or_else(|| AtlasError::TileTooLarge {
                    ch: tile.ch,
                    width: w,
                    height: h,
                    max_size: size,
                })?;
                bins.push(bin);
                (bins.len() - 1, x, y)
            }
        };
        placements[i] = Placement {
            page: index as u32 + 1,
            x,
            y,
        };
    }

    Ok((bins.len() as u32, placements))
}
