//! Render-all, pack, then compose and emit.

use crate::descriptor::{FaceInfo, FontDescriptor, emit};
use crate::error::AtlasError;
use crate::glyph::composite_all;
use crate::kerning::measure_kerning;
use crate::pack::pack;
use crate::page::compose_pages;
use crate::raster::Rasterizer;
use crate::settings::AtlasSettings;
use fondant_config::DescriptorFormat;
use image::RgbaImage;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

/// Where the atlas files go: `<dir>/<basename>.png`, `<dir>/<basename>_2.png`, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub dir: PathBuf,
    pub basename: String,
}

impl OutputTarget {
    /// Use `output` when given, else the font path; the extension is ignored.
    pub fn derive(font_path: &Path, output: Option<&Path>) -> Result<Self, AtlasError> {
        let path = output.unwrap_or(font_path);
        let basename = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                AtlasError::Config(format!("cannot derive a file name from {}", path.display()))
            })?;
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self { dir, basename })
    }

    pub fn page_file_name(&self, page: u32) -> String {
        if page > 1 {
            format!("{}_{}.png", self.basename, page)
        } else {
            format!("{}.png", self.basename)
        }
    }

    pub fn descriptor_path(&self, format: DescriptorFormat) -> PathBuf {
        self.dir
            .join(format!("{}.{}", self.basename, format.extension()))
    }
}

/// A finished atlas, ready to be written.
#[derive(Debug)]
pub struct AtlasOutput {
    pub pages: Vec<RgbaImage>,
    pub page_files: Vec<String>,
    pub descriptor: FontDescriptor,
    /// Requested characters the font could not render
    pub removed: Vec<char>,
}

pub fn build_atlas<R: Rasterizer + ?Sized>(
    rasterizer: &R,
    settings: &AtlasSettings,
    target: &OutputTarget,
    progress: &MultiProgress,
) -> Result<AtlasOutput, AtlasError> {
    log::info!("Rendering characters...");
    let bar = progress_bar(progress, settings.chars.len(), "render");
    let (tiles, removed) = composite_all(
        rasterizer,
        settings.chars.iter().copied(),
        &settings.style,
        |_| bar.inc(1),
    );
    bar.finish_and_clear();

    if !removed.is_empty() {
        log::warn!(
            "Removed the following unsupported chars: {}",
            removed.iter().collect::<String>()
        );
    }
    if tiles.is_empty() {
        return Err(AtlasError::EmptyCharset);
    }

    let kerning = if settings.kerning {
        log::info!("Generating kerning data...");
        let chars: Vec<char> = tiles.iter().map(|t| t.ch).collect();
        let bar = progress_bar(progress, chars.len(), "kerning");
        let pairs = measure_kerning(rasterizer, &chars, |_| bar.inc(1));
        bar.finish_and_clear();
        log::debug!("{} kerning pair(s)", pairs.len());
        Some(pairs)
    } else {
        None
    };

    log::info!("Packing...");
    let layout = pack(
        &tiles,
        settings.max_page_size,
        settings.square,
        settings.multipage,
    )?;
    log::debug!(
        "{} page(s) of {}x{}",
        layout.page_count,
        layout.width,
        layout.height
    );

    log::info!("Generating textures...");
    let pages = compose_pages(&layout, &tiles, settings.background, settings.premultiply);
    let page_files: Vec<String> = (1..=layout.page_count)
        .map(|page| target.page_file_name(page))
        .collect();

    log::info!("Generating font atlas...");
    let face = FaceInfo {
        name: rasterizer.face_name().to_string(),
        size: rasterizer.pixel_size(),
        line_height: rasterizer.line_height(),
    };
    let descriptor = emit(
        &face,
        &layout,
        &tiles,
        kerning.as_deref(),
        &page_files,
        settings,
    );

    Ok(AtlasOutput {
        pages,
        page_files,
        descriptor,
        removed,
    })
}

impl AtlasOutput {
    /// Save every page and the descriptor, returning the written paths.
    pub fn write(
        &self,
        target: &OutputTarget,
        format: DescriptorFormat,
        pretty: bool,
    ) -> Result<Vec<PathBuf>, AtlasError> {
        if !target.dir.as_os_str().is_empty() {
            fs_err::create_dir_all(&target.dir).map_err(|source| AtlasError::Io {
                path: target.dir.clone(),
                source,
            })?;
        }

        let mut written = Vec::with_capacity(self.pages.len() + 1);
        for (page, file) in self.pages.iter().zip(&self.page_files) {
            let path = target.dir.join(file);
            log::info!("Saving {}...", path.display());
            page.save(&path).map_err(|source| AtlasError::Image {
                path: path.clone(),
                source,
            })?;
            written.push(path);
        }

        let path = target.descriptor_path(format);
        let contents = self
            .descriptor
            .render(format, pretty)
            .map_err(|e| AtlasError::Io {
                path: path.clone(),
                source: e.into(),
            })?;
        fs_err::write(&path, contents).map_err(|source| AtlasError::Io {
            path: path.clone(),
            source,
        })?;
        written.push(path);

        Ok(written)
    }
}

fn progress_bar(progress: &MultiProgress, len: usize, label: &'static str) -> ProgressBar {
    let style = ProgressStyle::with_template("{prefix:>8} [{bar:30}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    progress.add(
        ProgressBar::new(len as u64)
            .with_style(style)
            .with_prefix(label),
    )
}
