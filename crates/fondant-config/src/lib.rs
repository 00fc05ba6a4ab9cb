use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const FILE_NAME: &str = "fondant.toml";

/// Printable ASCII, space through tilde.
pub const DEFAULT_CHARS: &str = " !\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~";

/// Atlas generation options, as read from `fondant.toml`.
///
/// Every field has a default, so an empty file (or no file at all) is valid.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FondantConfig {
    /// Font size in pixels
    pub size: u32,

    /// Reference size that border and spacing values are authored for.
    /// Unset means the same as `size`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_size: Option<u32>,

    /// Padding on all sides of every glyph
    pub padding: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_top: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_left: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_right: Option<u32>,

    /// Glyph color
    pub color: Color,

    /// Outline width in pixels (0 disables the outline)
    pub border: u32,

    pub border_color: Color,

    /// Page fill color
    pub background: Color,

    /// Upper bound for page width and height
    pub max_page_size: u32,

    /// Force square pages
    pub square: bool,

    /// Characters to render
    pub chars: String,

    pub antialiasing: bool,

    /// Save pages with premultiplied alpha
    pub premultiply: bool,

    /// Measure and emit kerning pairs
    pub kerning: bool,

    /// Extra horizontal advance per character
    pub char_spacing: i32,

    /// Extra space between lines
    pub line_spacing: i32,

    /// Indent the descriptor
    pub pretty_print: bool,

    /// Spill into additional pages when one page at max size is not enough
    pub multipage: bool,

    pub format: DescriptorFormat,
}

impl Default for FondantConfig {
    fn default() -> Self {
        Self {
            size: 64,
            base_size: None,
            padding: 2,
            padding_top: None,
            padding_bottom: None,
            padding_left: None,
            padding_right: None,
            color: Color::WHITE,
            border: 0,
            border_color: Color::BLACK,
            background: Color::TRANSPARENT,
            max_page_size: 1024,
            square: false,
            chars: DEFAULT_CHARS.to_string(),
            antialiasing: true,
            premultiply: false,
            kerning: false,
            char_spacing: 0,
            line_spacing: 0,
            pretty_print: false,
            multipage: false,
            format: DescriptorFormat::Xml,
        }
    }
}

impl FondantConfig {
    /// Load the configuration.
    ///
    /// An explicit path must exist. Without one, `fondant.toml` in the current
    /// directory is used when present, and the defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::read_from(path),
            None => {
                let path = PathBuf::from(FILE_NAME);
                if path.is_file() {
                    Self::read_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Read and parse a config file
    pub fn read_from(path: &Path) -> Result<Self> {
        let config_str = fs_err::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&config_str).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize configuration")
    }

    /// Per-side padding, each side falling back to the uniform `padding`.
    pub fn resolved_padding(&self) -> Padding {
        Padding {
            top: self.padding_top.unwrap_or(self.padding),
            bottom: self.padding_bottom.unwrap_or(self.padding),
            left: self.padding_left.unwrap_or(self.padding),
            right: self.padding_right.unwrap_or(self.padding),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Padding {
    pub fn uniform(value: u32) -> Self {
        Self {
            top: value,
            bottom: value,
            left: value,
            right: value,
        }
    }

    pub fn horizontal(&self) -> u32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> u32 {
        self.top + self.bottom
    }
}

/// Straight-alpha RGBA color written as `RRGGBB` or `RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const WHITE: Color = Color([255, 255, 255, 255]);
    pub const BLACK: Color = Color([0, 0, 0, 255]);
    pub const TRANSPARENT: Color = Color([0, 0, 0, 0]);

    pub fn alpha(&self) -> u8 {
        self.0[3]
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid color {0:?} (use RRGGBB or RRGGBBAA)")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseColorError(s.to_string()));
        }
        let value = match hex.len() {
            6 => u32::from_str_radix(hex, 16).map(|rgb| (rgb << 8) | 0xff),
            8 => u32::from_str_radix(hex, 16),
            _ => return Err(ParseColorError(s.to_string())),
        }
        .map_err(|_| ParseColorError(s.to_string()))?;

        Ok(Color(value.to_be_bytes()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        write!(f, "{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Layout of the emitted descriptor file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorFormat {
    /// BMFont XML
    #[default]
    Xml,
    /// BMFont text
    Text,
    Json,
}

impl DescriptorFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            DescriptorFormat::Xml | DescriptorFormat::Text => "fnt",
            DescriptorFormat::Json => "json",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown descriptor format {0:?} (expected xml, text or json)")]
pub struct ParseFormatError(pub String);

impl FromStr for DescriptorFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xml" => Ok(DescriptorFormat::Xml),
            "text" | "txt" => Ok(DescriptorFormat::Text),
            "json" => Ok(DescriptorFormat::Json),
            _ => Err(ParseFormatError(s.to_string())),
        }
    }
}
