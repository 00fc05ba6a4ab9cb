//! Bake a vector font into BMFont-style bitmap atlas pages and a descriptor.

pub mod blend;
pub mod descriptor;
pub mod error;
pub mod glyph;
pub mod kerning;
pub mod pack;
pub mod page;
pub mod pipeline;
pub mod raster;
pub mod settings;

pub use error::AtlasError;
pub use pipeline::{AtlasOutput, OutputTarget, build_atlas};
pub use settings::AtlasSettings;
