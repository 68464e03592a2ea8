//! Carousel Studio Render Library
//!
//! Turns slides into positioned drawing elements, and exports them as PNGs through a
//! resvg-backed rasterizer.

pub mod composition;
mod export;
mod raster;
mod surface;
pub mod svg;

pub use composition::{Composition, Element, ImageElement, OutlineKind, TextElement};
pub use export::{
    DirectorySink, DownloadSink, ExportError, ExportFailure, ExportOutcome, ExportReport, Exporter,
    export_file_name,
};
pub use raster::{PngImage, RasterError, RasterResult, Rasterizer, RasterizerLoader, SvgRasterizer, SvgRasterizerLoader};
pub use surface::{EDITOR_SCALE, EXPORT_SCALE, GRID_SCALE, RenderOptions, render};
