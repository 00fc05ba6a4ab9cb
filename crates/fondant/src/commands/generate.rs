use anyhow::Context;
use clap::Parser;
use fondant::raster::FontdueRasterizer;
use fondant::{AtlasSettings, OutputTarget, build_atlas};
use fondant_config::{Color, DescriptorFormat, FondantConfig};
use indicatif::MultiProgress;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Generate a bitmap font atlas from a .ttf/.otf font")]
pub struct GenerateArgs {
    /// Input font file; output files go next to it unless --output is set
    #[arg(value_name = "FONT")]
    pub font: PathBuf,

    /// Output path (extension ignored)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Config file (defaults to ./fondant.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Font size in pixels
    #[arg(short, long)]
    pub size: Option<u32>,

    /// Size that border and spacing values are authored for
    #[arg(long)]
    pub base_size: Option<u32>,

    /// Padding on all sides
    #[arg(short, long)]
    pub padding: Option<u32>,

    /// Top padding (overrides --padding)
    #[arg(long)]
    pub padding_top: Option<u32>,

    /// Bottom padding (overrides --padding)
    #[arg(long)]
    pub padding_bottom: Option<u32>,

    /// Left padding (overrides --padding)
    #[arg(long)]
    pub padding_left: Option<u32>,

    /// Right padding (overrides --padding)
    #[arg(long)]
    pub padding_right: Option<u32>,

    /// Font color (RRGGBB or RRGGBBAA)
    #[arg(short, long, value_name = "COLOR")]
    pub color: Option<Color>,

    /// Border width (0 for none)
    #[arg(short, long)]
    pub border: Option<u32>,

    /// Border color (RRGGBB or RRGGBBAA)
    #[arg(long, value_name = "COLOR")]
    pub border_color: Option<Color>,

    /// Background color (RRGGBB or RRGGBBAA)
    #[arg(long, value_name = "COLOR")]
    pub background: Option<Color>,

    /// Largest allowed page width/height
    #[arg(long)]
    pub max_page_size: Option<u32>,

    /// Make pages square
    #[arg(long)]
    pub square: bool,

    /// Characters to render
    #[arg(long)]
    pub chars: Option<String>,

    /// Disable antialiasing
    #[arg(long)]
    pub no_antialiasing: bool,

    /// Save pages with premultiplied alpha
    #[arg(long)]
    pub premultiply: bool,

    /// Include kerning for character pairs
    #[arg(long)]
    pub kerning: bool,

    /// Extra space between characters
    #[arg(long, allow_hyphen_values = true)]
    pub char_spacing: Option<i32>,

    /// Extra space between lines
    #[arg(long, allow_hyphen_values = true)]
    pub line_spacing: Option<i32>,

    /// Use multiple lines and indentation for the descriptor
    #[arg(long)]
    pub pretty_print: bool,

    /// Allow several max-size pages when one is not enough
    #[arg(long)]
    pub multipage: bool,

    /// Descriptor format: xml, text or json
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<DescriptorFormat>,
}

impl GenerateArgs {
    /// Layer the command line over the config file.
    pub fn apply(&self, mut config: FondantConfig) -> FondantConfig {
        if let Some(size) = self.size {
            config.size = size;
        }
        if let Some(padding) = self.padding {
            config.padding = padding;
        }
        if let Some(color) = self.color {
            config.color = color;
        }
        if let Some(border) = self.border {
            config.border = border;
        }
        if let Some(border_color) = self.border_color {
            config.border_color = border_color;
        }
        if let Some(background) = self.background {
            config.background = background;
        }
        if let Some(max_page_size) = self.max_page_size {
            config.max_page_size = max_page_size;
        }
        if let Some(chars) = &self.chars {
            config.chars = chars.clone();
        }
        if let Some(char_spacing) = self.char_spacing {
            config.char_spacing = char_spacing;
        }
        if let Some(line_spacing) = self.line_spacing {
            config.line_spacing = line_spacing;
        }
        if let Some(format) = self.format {
            config.format = format;
        }

        config.base_size = self.base_size.or(config.base_size);
        config.padding_top = self.padding_top.or(config.padding_top);
        config.padding_bottom = self.padding_bottom.or(config.padding_bottom);
        config.padding_left = self.padding_left.or(config.padding_left);
        config.padding_right = self.padding_right.or(config.padding_right);

        config.square |= self.square;
        config.premultiply |= self.premultiply;
        config.kerning |= self.kerning;
        config.pretty_print |= self.pretty_print;
        config.multipage |= self.multipage;
        if self.no_antialiasing {
            config.antialiasing = false;
        }
        config
    }
}

pub fn run(args: GenerateArgs, progress: &MultiProgress) -> bool {
    match run_impl(args, progress) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("[generate] ERROR: {e:#}");
            false
        }
    }
}

fn run_impl(args: GenerateArgs, progress: &MultiProgress) -> anyhow::Result<()> {
    let config = args.apply(FondantConfig::load(args.config.as_deref())?);
    let settings = AtlasSettings::from_config(&config)?;
    let target = OutputTarget::derive(&args.font, args.output.as_deref())?;

    let rasterizer = FontdueRasterizer::open(&args.font, settings.size, settings.antialiasing)?;
    let atlas = build_atlas(&rasterizer, &settings, &target, progress)
        .with_context(|| format!("failed to build atlas for {}", args.font.display()))?;

    let written = atlas.write(&target, config.format, config.pretty_print)?;
    log::info!(
        "Done: {} glyph(s), {} page(s), {} file(s) written",
        atlas.descriptor.chars.len(),
        atlas.pages.len(),
        written.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> GenerateArgs {
        GenerateArgs::try_parse_from(std::iter::once("generate").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn flags_override_config_file_values() {
        let file = FondantConfig {
            size: 48,
            border: 1,
            kerning: false,
            ..FondantConfig::default()
        };
        let args = parse(&[
            "font.ttf",
            "--size",
            "24",
            "--kerning",
            "--color",
            "ff000080",
            "--char-spacing",
            "-2",
            "--no-antialiasing",
            "--padding-left",
            "0",
        ]);
        let config = args.apply(file);

        assert_eq!(config.size, 24);
        assert_eq!(config.border, 1);
        assert!(config.kerning);
        assert!(!config.antialiasing);
        assert_eq!(config.color, Color([255, 0, 0, 128]));
        assert_eq!(config.char_spacing, -2);
        assert_eq!(config.padding_left, Some(0));
    }

    #[test]
    fn absent_flags_keep_file_values() {
        let file = FondantConfig {
            premultiply: true,
            format: DescriptorFormat::Json,
            ..FondantConfig::default()
        };
        let config = parse(&["font.ttf"]).apply(file.clone());
        assert_eq!(config, file);
    }

    #[test]
    fn malformed_color_is_rejected_at_parse_time() {
        let err = GenerateArgs::try_parse_from(["generate", "font.ttf", "--color", "12345"])
            .unwrap_err();
        assert!(err.to_string().contains("invalid color"));
    }
}
