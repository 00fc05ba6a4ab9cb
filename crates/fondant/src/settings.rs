use crate::error::AtlasError;
use crate::pack::MIN_PAGE_SIZE;
use fondant_config::{Color, FondantConfig, Padding};
use std::collections::BTreeSet;

/// Glyph appearance, shared by every tile in one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphStyle {
    pub color: Color,
    /// Outline width after scaling
    pub border: u32,
    pub border_color: Color,
    pub padding: Padding,
}

/// A validated, immutable configuration for one atlas build.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasSettings {
    pub size: u32,
    pub chars: BTreeSet<char>,
    pub style: GlyphStyle,
    pub background: Color,
    pub max_page_size: u32,
    pub square: bool,
    pub multipage: bool,
    pub premultiply: bool,
    pub kerning: bool,
    pub antialiasing: bool,
    pub char_spacing: i32,
    pub line_spacing: i32,
}

impl AtlasSettings {
    pub fn from_config(config: &FondantConfig) -> Result<Self, AtlasError> {
        if config.size == 0 {
            return Err(AtlasError::Config("size must be > 0".into()));
        }
        let base_size = config.base_size.unwrap_or(config.size);
        if base_size == 0 {
            return Err(AtlasError::Config("base-size must be > 0".into()));
        }
        if config.max_page_size < MIN_PAGE_SIZE {
            return Err(AtlasError::Config(format!(
                "max-page-size must be at least {MIN_PAGE_SIZE} (got {})",
                config.max_page_size
            )));
        }

        let chars: BTreeSet<char> = config.chars.chars().collect();
        if chars.is_empty() {
            return Err(AtlasError::Config("chars must not be empty".into()));
        }

        let scale = config.size as f32 / base_size as f32;

        Ok(Self {
            size: config.size,
            chars,
            style: GlyphStyle {
                color: config.color,
                border: (config.border as f32 * scale).round() as u32,
                border_color: config.border_color,
                padding: config.resolved_padding(),
            },
            background: config.background,
            max_page_size: config.max_page_size,
            square: config.square,
            multipage: config.multipage,
            premultiply: config.premultiply,
            kerning: config.kerning,
            antialiasing: config.antialiasing,
            char_spacing: (config.char_spacing as f32 * scale).round() as i32,
            line_spacing: (config.line_spacing as f32 * scale).round() as i32,
        })
    }

    /// Border width counted on both sides of a glyph.
    pub fn border_span(&self) -> i64 {
        2 * i64::from(self.style.border)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chars_are_deduplicated_and_sorted() {
        let config = FondantConfig {
            chars: "cabbac".into(),
            ..FondantConfig::default()
        };
        let settings = AtlasSettings::from_config(&config).unwrap();
        assert_eq!(settings.chars.iter().collect::<String>(), "abc");
    }

    #[test]
    fn border_and_spacing_follow_base_size() {
        let config = FondantConfig {
            size: 32,
            base_size: Some(64),
            border: 4,
            char_spacing: 3,
            line_spacing: -6,
            padding: 2,
            ..FondantConfig::default()
        };
        let settings = AtlasSettings::from_config(&config).unwrap();

        assert_eq!(settings.style.border, 2);
        assert_eq!(settings.char_spacing, 2);
        assert_eq!(settings.line_spacing, -3);
        assert_eq!(settings.style.padding, Padding::uniform(2));
        assert_eq!(settings.border_span(), 4);
    }

    #[test]
    fn degenerate_values_are_rejected() {
        let cases = [
            FondantConfig {
                size: 0,
                ..FondantConfig::default()
            },
            FondantConfig {
                base_size: Some(0),
                ..FondantConfig::default()
            },
            FondantConfig {
                max_page_size: 64,
                ..FondantConfig::default()
            },
            FondantConfig {
                chars: String::new(),
                ..FondantConfig::default()
            },
        ];
        for config in cases {
            assert!(matches!(
                AtlasSettings::from_config(&config),
                Err(AtlasError::Config(_))
            ));
        }
    }
}
