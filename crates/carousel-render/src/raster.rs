//! Composition to PNG rasterization.
//!
//! The default backend serializes the composition to SVG and renders it with resvg. It is
//! created through a [`RasterizerLoader`] so font discovery only happens on first export.

use crate::composition::Composition;
use crate::svg::to_svg;
use carousel_core::model::decode_data_uri;
use carousel_core::storage::BoxFuture;
use kurbo::Size;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Rasterization errors.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Failed to load rasterizer: {0}")]
    LoadFailed(String),
    #[error("Invalid SVG: {0}")]
    Svg(String),
    #[error("Cannot allocate a {width}x{height} canvas")]
    Allocation { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Result type for rasterizer operations.
pub type RasterResult<T> = Result<T, RasterError>;

/// Encoded PNG image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngImage {
    pub png_data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Turns a composition into PNG bytes.
pub trait Rasterizer: Send + Sync {
    fn rasterize<'a>(&'a self, composition: &'a Composition) -> BoxFuture<'a, RasterResult<PngImage>>;
}

/// Creates a rasterizer on demand.
pub trait RasterizerLoader: Send + Sync {
    fn load(&self) -> BoxFuture<'_, RasterResult<Arc<dyn Rasterizer>>>;
}

/// resvg-backed rasterizer.
pub struct SvgRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl SvgRasterizer {
    /// Create a rasterizer with system fonts plus any fonts in `font_dir`.
    pub fn new(font_dir: Option<&Path>) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = font_dir {
            load_fonts_from_dir(&mut db, dir);
        }
        log::info!("Rasterizer ready with {} font faces", db.len());
        Self { fontdb: Arc::new(db) }
    }

    /// Render an SVG document to a PNG of `width` x `height` pixels.
    pub fn render_svg(&self, svg: &str, width: u32, height: u32) -> RasterResult<PngImage> {
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(svg, &options).map_err(|e| RasterError::Svg(e.to_string()))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or(RasterError::Allocation { width, height })?;
        let sx = width as f32 / tree.size().width();
        let sy = height as f32 / tree.size().height();
        resvg::render(&tree, resvg::tiny_skia::Transform::from_scale(sx, sy), &mut pixmap.as_mut());

        let mut rgba = Vec::with_capacity(pixmap.data().len());
        for pixel in pixmap.pixels() {
            let c = pixel.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        let png_data = encode_png(&rgba, width, height)?;
        Ok(PngImage { png_data, width, height })
    }
}

impl Rasterizer for SvgRasterizer {
    fn rasterize<'a>(&'a self, composition: &'a Composition) -> BoxFuture<'a, RasterResult<PngImage>> {
        Box::pin(async move {
            let image_size = composition.image().and_then(|image| source_size(&image.href));
            let svg = to_svg(composition, image_size);
            let width = composition.size.width.round().max(1.0) as u32;
            let height = composition.size.height.round().max(1.0) as u32;
            self.render_svg(&svg, width, height)
        })
    }
}

/// Loads [`SvgRasterizer`] with an optional extra font directory.
#[derive(Debug, Clone, Default)]
pub struct SvgRasterizerLoader {
    font_dir: Option<PathBuf>,
}

impl SvgRasterizerLoader {
    pub fn new(font_dir: Option<PathBuf>) -> Self {
        Self { font_dir }
    }
}

impl RasterizerLoader for SvgRasterizerLoader {
    fn load(&self) -> BoxFuture<'_, RasterResult<Arc<dyn Rasterizer>>> {
        Box::pin(async move {
            let rasterizer: Arc<dyn Rasterizer> = Arc::new(SvgRasterizer::new(self.font_dir.as_deref()));
            Ok(rasterizer)
        })
    }
}

/// Pixel size of an image data URI.
fn source_size(href: &str) -> Option<Size> {
    let (_, bytes) = decode_data_uri(href)?;
    let (width, height) = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()?;
    Some(Size::new(f64::from(width), f64::from(height)))
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        log::warn!("Font directory {} is not readable", dir.display());
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if !path.is_file() || !matches!(ext.as_str(), "ttf" | "otf" | "ttc") {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            log::warn!("Skipping font {}: {}", path.display(), e);
        }
    }
}

/// Encode RGBA pixel data to PNG bytes.
fn encode_png(rgba: &[u8], width: u32, height: u32) -> RasterResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().map_err(|e| RasterError::Encode(e.to_string()))?;
        writer.write_image_data(rgba).map_err(|e| RasterError::Encode(e.to_string()))?;
        writer.finish().map_err(|e| RasterError::Encode(e.to_string()))?;
    }
    Ok(png_data)
}
