//! Exporting every slide of a project as a PNG download.

use crate::raster::{PngImage, RasterError, Rasterizer, RasterizerLoader};
use crate::surface::{RenderOptions, render};
use carousel_core::model::Slide;
use carousel_core::storage::BoxFuture;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error("IO error: {0}")]
    Io(String),
}

/// Receives each exported file.
pub trait DownloadSink: Send + Sync {
    fn save<'a>(&'a self, file_name: &'a str, image: &'a PngImage) -> BoxFuture<'a, Result<(), ExportError>>;
}

/// A slide that failed to export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFailure {
    pub file_name: String,
    pub reason: String,
}

/// What an export produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// File names handed to the sink, in slide order.
    pub exported: Vec<String>,
    pub failed: Vec<ExportFailure>,
}

/// Result of an export call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Another export was already running; nothing was done.
    Busy,
    Completed(ExportReport),
}

/// File name for slide `index` of a project.
pub fn export_file_name(project_name: &str, index: usize) -> String {
    format!("{}-{}.png", project_name, index + 1)
}

/// Clears the in-flight flag however the export ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Renders slides at export resolution and hands the PNGs to a sink.
pub struct Exporter<L: RasterizerLoader, D: DownloadSink> {
    loader: L,
    sink: D,
    /// Loaded on first export.
    rasterizer: Mutex<Option<Arc<dyn Rasterizer>>>,
    in_flight: AtomicBool,
}

impl<L: RasterizerLoader, D: DownloadSink> Exporter<L, D> {
    pub fn new(loader: L, sink: D) -> Self {
        Self {
            loader,
            sink,
            rasterizer: Mutex::new(None),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether an export is running.
    pub fn is_exporting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    /// Export every slide as `<project_name>-<n>.png`, one after another.
    ///
    /// Returns [`ExportOutcome::Busy`] if an export is already running. A slide that fails is
    /// recorded in the report and the rest continue. Only a rasterizer that cannot be loaded
    /// fails the whole export.
    pub async fn export(&self, project_name: &str, slides: &[Slide]) -> Result<ExportOutcome, ExportError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            log::warn!("Export already in progress");
            return Ok(ExportOutcome::Busy);
        }
        let _in_flight = InFlight(&self.in_flight);

        let rasterizer = self.rasterizer().await?;
        let options = RenderOptions::export();
        let mut report = ExportReport::default();

        for (index, slide) in slides.iter().enumerate() {
            let file_name = export_file_name(project_name, index);
            let composition = render(slide, &options);
            let result = match rasterizer.rasterize(&composition).await {
                Ok(image) => self.sink.save(&file_name, &image).await,
                Err(e) => Err(e.into()),
            };
            match result {
                Ok(()) => {
                    log::info!("Exported {}", file_name);
                    report.exported.push(file_name);
                }
                Err(e) => {
                    log::error!("Failed to export {}: {}", file_name, e);
                    report.failed.push(ExportFailure { file_name, reason: e.to_string() });
                }
            }
        }

        Ok(ExportOutcome::Completed(report))
    }

    async fn rasterizer(&self) -> Result<Arc<dyn Rasterizer>, RasterError> {
        if let Some(rasterizer) = self.rasterizer.lock().unwrap_or_else(PoisonError::into_inner).clone() {
            return Ok(rasterizer);
        }
        log::info!("Loading rasterizer");
        let rasterizer = self.loader.load().await?;
        *self.rasterizer.lock().unwrap_or_else(PoisonError::into_inner) = Some(rasterizer.clone());
        Ok(rasterizer)
    }
}

/// Writes downloads into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a file name is written to. Path separators and other unsafe characters become `_`.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        let safe: String = file_name
            .chars()
            .map(|c| if c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') { c } else { '_' })
            .collect();
        self.dir.join(safe)
    }
}

impl DownloadSink for DirectorySink {
    fn save<'a>(&'a self, file_name: &'a str, image: &'a PngImage) -> BoxFuture<'a, Result<(), ExportError>> {
        Box::pin(async move {
            let path = self.path_for(file_name);
            fs::create_dir_all(&self.dir)
                .and_then(|_| fs::write(&path, &image.png_data))
                .map_err(|e| ExportError::Io(format!("Failed to write {}: {}", path.display(), e)))
        })
    }
}
