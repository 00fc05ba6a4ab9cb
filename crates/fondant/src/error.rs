use std::path::PathBuf;

/// Everything that can abort an atlas build.
///
/// Unsupported characters are not errors; they are dropped from the
/// character set and reported by the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to load font {path}: {reason}")]
    Font { path: PathBuf, reason: String },

    #[error("none of the requested characters are supported by the font")]
    EmptyCharset,

    #[error(
        "{count} glyph(s) do not fit on a single {max_size}x{max_size} page \
         (raise max-page-size or enable multipage)"
    )]
    Unpackable { count: usize, max_size: u32 },

    #[error("glyph {ch:?} is {width}x{height}, larger than the {max_size}x{max_size} page limit")]
    TileTooLarge {
        ch: char,
        width: u32,
        height: u32,
        max_size: u32,
    },

    #[error("failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {path}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
