//! PDF rasterisation: render the first page of a PDF to a `DynamicImage`.
//!
//! PDF parsing and drawing belong to pdfium; this module only asks it for
//! "load from bytes, take page 1, render at scale S". The [`PageRasterizer`]
//! trait is that capability, so tests and embedders can plug in their own.
//!
//! pdfium is not async-safe, so [`rasterize_first_page`] runs the rasteriser
//! on tokio's blocking pool.

use crate::error::ScanError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// A page rendered to pixels.
#[derive(Debug, Clone)]
pub struct RasterizedPage {
    pub image: DynamicImage,
    /// Page count of the whole document.
    pub page_count: usize,
}

/// Something that can render page 1 of a PDF held in memory.
///
/// Implementations are called from a blocking thread and may block.
pub trait PageRasterizer: Send + Sync {
    /// Render the first page at `scale` × its native size.
    fn render_first_page(&self, pdf: &[u8], scale: f32) -> Result<RasterizedPage, ScanError>;
}

/// pdfium-backed rasteriser.
#[derive(Debug, Clone, Default)]
pub struct PdfiumRasterizer {
    library_path: Option<PathBuf>,
}

impl PdfiumRasterizer {
    /// Bind to the system pdfium library on each render.
    pub fn system() -> Self {
        Self { library_path: None }
    }

    /// Bind to the pdfium library at `path`: the library file, or the
    /// directory containing it.
    pub fn with_library(path: impl Into<PathBuf>) -> Self {
        Self {
            library_path: Some(path.into()),
        }
    }

    fn bind(&self) -> Result<Pdfium, ScanError> {
        let bindings = match &self.library_path {
            Some(path) => Pdfium::bind_to_library(&library_file(path)),
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| ScanError::PdfiumBindingFailed(format!("{:?}", e)))?;
        Ok(Pdfium::new(bindings))
    }
}

fn library_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        Pdfium::pdfium_platform_library_name_at_path(&path.to_path_buf())
    } else {
        path.to_path_buf()
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn render_first_page(&self, pdf: &[u8], scale: f32) -> Result<RasterizedPage, ScanError> {
        let pdfium = self.bind()?;

        let document = pdfium
            .load_pdf_from_byte_slice(pdf, None)
            .map_err(|e| ScanError::ConversionFailure {
                detail: format!("could not load PDF: {:?}", e),
            })?;

        let pages = document.pages();
        let page_count = pages.len() as usize;
        if page_count == 0 {
            return Err(ScanError::ConversionFailure {
                detail: "PDF has no pages".into(),
            });
        }

        let page = pages.get(0).map_err(|e| ScanError::ConversionFailure {
            detail: format!("could not open page 1: {:?}", e),
        })?;

        let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| ScanError::ConversionFailure {
                detail: format!("could not render page 1: {:?}", e),
            })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page 1/{} at {}x → {}x{} px",
            page_count,
            scale,
            image.width(),
            image.height()
        );

        Ok(RasterizedPage { image, page_count })
    }
}

/// Render page 1 of `pdf` on the blocking pool.
pub async fn rasterize_first_page(
    rasterizer: Arc<dyn PageRasterizer>,
    pdf: Vec<u8>,
    scale: f32,
) -> Result<RasterizedPage, ScanError> {
    tokio::task::spawn_blocking(move || rasterizer.render_first_page(&pdf, scale))
        .await
        .map_err(|e| ScanError::Internal(format!("Render task panicked: {}", e)))?
}
