//! BMFont-style atlas descriptors: the record model, field derivation, and
//! the XML, text and JSON writers.

mod text;
mod xml;

use crate::glyph::GlyphTile;
use crate::kerning::KerningPair;
use crate::pack::PackedLayout;
use crate::settings::AtlasSettings;
use fondant_config::DescriptorFormat;
use serde::Serialize;

/// Font-level values the descriptor needs from the rasterizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceInfo {
    pub name: String,
    pub size: u32,
    /// Backend line height before spacing and border are added
    pub line_height: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontDescriptor {
    pub info: InfoRecord,
    pub common: CommonRecord,
    pub pages: Vec<PageRecord>,
    pub chars: Vec<CharRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kernings: Option<Vec<KerningRecord>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoRecord {
    pub face: String,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonRecord {
    pub line_height: i64,
    pub scale_w: u32,
    pub scale_h: u32,
    pub pages: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRecord {
    pub id: u32,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharRecord {
    pub id: u32,
    pub width: u32,
    pub height: u32,
    pub page: u32,
    pub x: u32,
    pub y: u32,
    pub chnl: u32,
    pub letter: String,
    pub xoffset: i64,
    pub yoffset: i64,
    pub xadvance: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KerningRecord {
    pub first: u32,
    pub second: u32,
    pub amount: i32,
}

/// Build the descriptor for a packed atlas.
///
/// `page_files` holds one file name per page, in page order. `kerning` is
/// `None` when kerning was not requested, which omits the section entirely.
pub fn emit(
    face: &FaceInfo,
    layout: &PackedLayout,
    tiles: &[GlyphTile],
    kerning: Option<&[KerningPair]>,
    page_files: &[String],
    settings: &AtlasSettings,
) -> FontDescriptor {
    let pad = settings.style.padding;
    let border_span = settings.border_span();
    let line_spacing = i64::from(settings.line_spacing);
    let base_line_height = i64::from(face.line_height);

    let chars = tiles
        .iter()
        .zip(&layout.placements)
        .map(|(tile, placement)| {
            let tile_height = i64::from(tile.height());
            let min_y = decode_bearing(tile.metrics.min_y);
            CharRecord {
                id: tile.ch as u32,
                width: tile.width() - pad.horizontal(),
                height: tile.height() - pad.vertical(),
                page: placement.page,
                x: placement.x + pad.left,
                y: placement.y + pad.top,
                chnl: 0,
                letter: display_name(tile.ch),
                xoffset: decode_bearing(tile.metrics.min_x),
                yoffset: base_line_height - tile_height + line_spacing - min_y + border_span,
                xadvance: tile.metrics.advance.round() as i64
                    + i64::from(settings.char_spacing)
                    + border_span,
            }
        })
        .collect();

    let pages = page_files
        .iter()
        .enumerate()
        .map(|(index, file)| PageRecord {
            id: index as u32 + 1,
            file: file.clone(),
        })
        .collect();

    let kernings = kerning.map(|pairs| {
        pairs
            .iter()
            .map(|pair| KerningRecord {
                first: pair.first as u32,
                second: pair.second as u32,
                amount: pair.amount,
            })
            .collect()
    });

    FontDescriptor {
        info: InfoRecord {
            face: face.name.clone(),
            size: face.size,
        },
        common: CommonRecord {
            line_height: base_line_height + line_spacing + border_span,
            scale_w: layout.width,
            scale_h: layout.height,
            pages: layout.page_count,
        },
        pages,
        chars,
        kernings,
    }
}

/// Reinterpret a metric that arrived as an unsigned 32-bit quantity.
///
/// Values in `0x8000_0000..=0xFFFF_FFFF` are two's-complement negatives.
pub fn decode_bearing(raw: i64) -> i64 {
    if (0x8000_0000..=0xFFFF_FFFF).contains(&raw) {
        raw - 0x1_0000_0000
    } else {
        raw
    }
}

/// Name written to the `letter` field.
pub fn display_name(ch: char) -> String {
    match ch {
        ' ' => "space".to_string(),
        '"' => "quote".to_string(),
        c if c.is_whitespace() || c.is_control() => format!("U+{:04X}", c as u32),
        c => c.to_string(),
    }
}

impl FontDescriptor {
    pub fn render(&self, format: DescriptorFormat, pretty: bool) -> serde_json::Result<String> {
        match format {
            DescriptorFormat::Xml => Ok(xml::render(self, pretty)),
            DescriptorFormat::Text => Ok(text::render(self)),
            DescriptorFormat::Json if pretty => serde_json::to_string_pretty(self),
            DescriptorFormat::Json => serde_json::to_string(self),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::glyph::composite_all;
    use crate::kerning::measure_kerning;
    use crate::pack::pack;
    use crate::raster::{GlyphMetrics, Rasterizer, SyntheticGlyph, SyntheticRasterizer};
    use fondant_config::FondantConfig;

    pub(crate) fn sample_rasterizer() -> SyntheticRasterizer {
        SyntheticRasterizer::new(32, 16)
            .with_glyph('A', SyntheticGlyph::new(10, 12, 11.4).with_bearing(1, 0))
            .with_glyph('B', SyntheticGlyph::new(9, 12, 10.6).with_bearing(0, -2))
            .with_kerning('A', 'B', -1.0)
    }

    /// "AB" at size 32 with 2px padding, optionally with kerning.
    pub(crate) fn sample_descriptor(kerning: bool) -> FontDescriptor {
        let config = FondantConfig {
            size: 32,
            chars: "AB".into(),
            kerning,
            ..FondantConfig::default()
        };
        let settings = AtlasSettings::from_config(&config).unwrap();
        let r = sample_rasterizer();
        let (tiles, _) = composite_all(&r, settings.chars.iter().copied(), &settings.style, |_| {});
        let layout = pack(&tiles, settings.max_page_size, false, false).unwrap();
        let pairs = kerning.then(|| measure_kerning(&r, &['A', 'B'], |_| {}));
        let face = FaceInfo {
            name: r.face_name().to_string(),
            size: r.pixel_size(),
            line_height: r.line_height(),
        };
        emit(
            &face,
            &layout,
            &tiles,
            pairs.as_deref(),
            &["atlas.png".to_string()],
            &settings,
        )
    }

    #[test]
    fn records_strip_padding_and_apply_metrics() {
        let descriptor = sample_descriptor(false);

        assert_eq!(descriptor.common.line_height, 16);
        assert_eq!(descriptor.chars.len(), 2);
        assert_eq!(
            descriptor.chars[0],
            CharRecord {
                id: 65,
                width: 10,
                height: 12,
                page: 1,
                x: 2,
                y: 2,
                chnl: 0,
                letter: "A".into(),
                xoffset: 1,
                yoffset: 0,
                xadvance: 11,
            }
        );
        assert_eq!(descriptor.chars[1].x, 16);
        assert_eq!(descriptor.chars[1].yoffset, 2);
        assert_eq!(descriptor.chars[1].xadvance, 11);
        assert!(descriptor.kernings.is_none());
    }

    #[test]
    fn kerning_section_lists_measured_pairs() {
        let descriptor = sample_descriptor(true);
        assert_eq!(
            descriptor.kernings,
            Some(vec![KerningRecord {
                first: 65,
                second: 66,
                amount: -1
            }])
        );
    }

    #[test]
    fn border_and_spacing_shift_metrics() {
        let config = FondantConfig {
            size: 32,
            chars: "A".into(),
            padding: 1,
            border: 2,
            char_spacing: 3,
            line_spacing: 5,
            ..FondantConfig::default()
        };
        let settings = AtlasSettings::from_config(&config).unwrap();
        let r = sample_rasterizer();
        let (tiles, _) = composite_all(&r, settings.chars.iter().copied(), &settings.style, |_| {});
        let layout = pack(&tiles, 1024, false, false).unwrap();
        let face = FaceInfo {
            name: "Synthetic".into(),
            size: 32,
            line_height: 16,
        };
        let d = emit(&face, &layout, &tiles, None, &["f.png".to_string()], &settings);

        // Tile is 10+2+4 by 12+2+4.
        assert_eq!(d.common.line_height, 16 + 5 + 4);
        assert_eq!((d.chars[0].width, d.chars[0].height), (14, 16));
        assert_eq!(d.chars[0].yoffset, 16 - 18 + 5 - 0 + 4);
        assert_eq!(d.chars[0].xadvance, 11 + 3 + 4);
    }

    #[test]
    fn unsigned_bearings_decode_to_negatives() {
        assert_eq!(decode_bearing(0xFFFF_FFFF), -1);
        assert_eq!(decode_bearing(0x8000_0000), i64::from(i32::MIN));
        assert_eq!(decode_bearing(0x7FFF_FFFF), 0x7FFF_FFFF);
        assert_eq!(decode_bearing(-3), -3);
    }

    #[test]
    fn wrapped_bearings_flow_through_to_offsets() {
        let mut tiles = Vec::new();
        let settings = AtlasSettings::from_config(&FondantConfig {
            padding: 0,
            chars: "j".into(),
            ..FondantConfig::default()
        })
        .unwrap();
        tiles.push(GlyphTile {
            ch: 'j',
            image: image::RgbaImage::new(4, 10),
            metrics: GlyphMetrics {
                min_x: 0xFFFF_FFFF,
                max_x: 3,
                min_y: 0xFFFF_FFFF,
                max_y: 9,
                advance: 4.0,
            },
        });
        let layout = pack(&tiles, 1024, false, false).unwrap();
        let face = FaceInfo {
            name: "f".into(),
            size: 64,
            line_height: 20,
        };
        let d = emit(&face, &layout, &tiles, None, &["f.png".to_string()], &settings);

        assert_eq!(d.chars[0].xoffset, -1);
        assert_eq!(d.chars[0].yoffset, 20 - 10 + 1);
    }

    #[test]
    fn display_names() {
        assert_eq!(display_name(' '), "space");
        assert_eq!(display_name('\t'), "U+0009");
        assert_eq!(display_name('é'), "é");
        assert_eq!(display_name('"'), "quote");
    }

    #[test]
    fn json_uses_bmfont_field_names() {
        let json = sample_descriptor(true)
            .render(DescriptorFormat::Json, false)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["common"]["lineHeight"], 16);
        assert_eq!(value["common"]["scaleW"], 128);
        assert_eq!(value["info"]["face"], "Synthetic");
        assert_eq!(value["pages"][0]["file"], "atlas.png");
        assert_eq!(value["chars"][1]["letter"], "B");
        assert_eq!(value["kernings"][0]["amount"], -1);
    }
}
