//! The upload form: select a file, submit it, show the outcome.
//!
//! [`ScanForm`] owns the selected file and the [`UiState`]. A submission
//! takes `&mut self` for its whole duration, so a second one cannot start
//! while the first is in flight, and it always ends in exactly one of
//! [`UiState::Error`] or [`UiState::Result`].
//!
//! ```text
//! select_file ──▶ Idle ──submit──▶ Loading ──┬──▶ Result(ocr)
//!      │                                     └──▶ Error(msg)
//!      └── wrong type ──▶ Error(msg)
//! ```

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::output::{ConvertedImage, OcrResult};
use crate::pipeline::input::{self, MediaKind, PickedFile, SelectedFile};
use crate::pipeline::render::{self, PageRasterizer, PdfiumRasterizer};
use crate::pipeline::{encode, upload};
use crate::state::UiState;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// File name given to a PDF's rendered first page.
pub const CONVERTED_FILE_NAME: &str = "converted.jpg";

/// Interactive form state plus the collaborators a submission needs.
pub struct ScanForm {
    config: ScanConfig,
    client: reqwest::Client,
    rasterizer: Arc<dyn PageRasterizer>,
    selected: Option<SelectedFile>,
    state: UiState,
}

impl ScanForm {
    /// Create an empty form.
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        let client = upload::build_client(config.request_timeout_secs)?;
        let rasterizer = resolve_rasterizer(&config);
        Ok(Self {
            config,
            client,
            rasterizer,
            selected: None,
            state: UiState::Idle,
        })
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    /// Submit is enabled only with a file selected and nothing in flight.
    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && !self.state.is_loading()
    }

    /// Replace the selection with `picked`.
    ///
    /// A JPEG or PDF becomes the new selection and clears any shown error or
    /// result. Anything else clears the selection and shows the
    /// invalid-type error.
    pub fn select_file(&mut self, picked: PickedFile) -> Result<&SelectedFile, ScanError> {
        match SelectedFile::try_from(picked) {
            Ok(file) => {
                info!("Selected: {} ({})", file.name, file.media_type());
                self.set_state(UiState::Idle);
                Ok(&*self.selected.insert(file))
            }
            Err(e) => {
                warn!("{}", e);
                self.selected = None;
                self.set_state(UiState::Error(e.user_message()));
                Err(e)
            }
        }
    }

    /// Read `path` and select it. The declared type comes from the
    /// extension unless `media_type` is given.
    pub async fn select_path(
        &mut self,
        path: &Path,
        media_type: Option<&str>,
    ) -> Result<&SelectedFile, ScanError> {
        let picked = input::pick_file(path, media_type).await?;
        self.select_file(picked)
    }

    /// Upload the selected file and record the outcome.
    ///
    /// With nothing selected this fails at once without entering
    /// [`UiState::Loading`]. Otherwise the form is `Loading` until the
    /// returned future completes, then `Result` or `Error`.
    pub async fn submit(&mut self) -> Result<OcrResult, ScanError> {
        if self.selected.is_none() {
            let e = ScanError::NoFileSelected;
            self.set_state(UiState::Error(e.user_message()));
            return Err(e);
        }

        self.set_state(UiState::Loading);
        let start = Instant::now();
        let outcome = self.run_submission().await;

        match outcome {
            Ok(result) => {
                info!(
                    "Document processed in {}ms",
                    start.elapsed().as_millis()
                );
                self.set_state(UiState::Result(result.clone()));
                Ok(result)
            }
            Err(e) => {
                if e.is_hard_failure() {
                    error!("Document submission failed: {}", e);
                } else {
                    warn!("{}", e);
                }
                self.set_state(UiState::Error(e.user_message()));
                Err(e)
            }
        }
    }

    async fn run_submission(&self) -> Result<OcrResult, ScanError> {
        let file = self.selected.as_ref().ok_or(ScanError::NoFileSelected)?;

        let converted;
        let payload = match file.kind {
            MediaKind::Jpeg => file,
            MediaKind::Pdf => {
                converted =
                    convert_pdf_to_jpeg(file, Arc::clone(&self.rasterizer), &self.config).await?;
                if converted.page_count > 1 {
                    warn!(
                        "'{}' has {} pages; only page 1 is uploaded",
                        file.name, converted.page_count
                    );
                    if let Some(ref obs) = self.config.observer {
                        obs.on_first_page_only(converted.page_count);
                    }
                }
                &converted.file
            }
        };

        let envelope =
            upload::post_document(&self.client, &self.config.endpoint_url, payload).await?;
        upload::interpret_envelope(envelope, &self.config.endpoint_url)
    }

    fn set_state(&mut self, state: UiState) {
        debug!("State → {:?}", state);
        self.state = state;
        if let Some(ref obs) = self.config.observer {
            obs.on_state_change(&self.state);
        }
    }
}

/// Render page 1 of a PDF at the configured scale and encode it as JPEG.
///
/// Multi-page documents are truncated to their first page; the page count
/// is reported in [`ConvertedImage::page_count`].
pub async fn convert_pdf_to_jpeg(
    file: &SelectedFile,
    rasterizer: Arc<dyn PageRasterizer>,
    config: &ScanConfig,
) -> Result<ConvertedImage, ScanError> {
    let start = Instant::now();
    let page =
        render::rasterize_first_page(rasterizer, file.bytes.clone(), config.render_scale).await?;

    let quality = config.jpeg_quality;
    let image = page.image;
    let (width, height) = (image.width(), image.height());
    let bytes = tokio::task::spawn_blocking(move || encode::encode_jpeg(&image, quality))
        .await
        .map_err(|e| ScanError::Internal(format!("Encode task panicked: {}", e)))??;

    info!(
        "Converted '{}' page 1/{} → {}x{} JPEG in {}ms",
        file.name,
        page.page_count,
        width,
        height,
        start.elapsed().as_millis()
    );

    Ok(ConvertedImage {
        file: SelectedFile {
            name: CONVERTED_FILE_NAME.to_string(),
            kind: MediaKind::Jpeg,
            bytes,
        },
        page_count: page.page_count,
        width,
        height,
    })
}

/// Select `path` and submit it with a fresh form.
pub async fn scan(path: impl AsRef<Path>, config: &ScanConfig) -> Result<OcrResult, ScanError> {
    let mut form = ScanForm::new(config.clone())?;
    form.select_path(path.as_ref(), None).await?;
    form.submit().await
}

/// Synchronous wrapper around [`scan`].
///
/// Creates a temporary tokio runtime internally.
pub fn scan_sync(path: impl AsRef<Path>, config: &ScanConfig) -> Result<OcrResult, ScanError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ScanError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(scan(path, config))
}

/// Pre-built rasteriser first, then an explicit pdfium path, then the
/// system library.
fn resolve_rasterizer(config: &ScanConfig) -> Arc<dyn PageRasterizer> {
    if let Some(ref r) = config.renderer {
        return Arc::clone(r);
    }
    match config.renderer_library_path {
        Some(ref path) => Arc::new(PdfiumRasterizer::with_library(path.clone())),
        None => Arc::new(PdfiumRasterizer::system()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::render::RasterizedPage;
    use image::{DynamicImage, Rgba, RgbaImage};

    struct SolidRasterizer {
        pages: usize,
    }

    impl PageRasterizer for SolidRasterizer {
        fn render_first_page(&self, _pdf: &[u8], scale: f32) -> Result<RasterizedPage, ScanError> {
            let w = (40.0 * scale).round() as u32;
            let h = (60.0 * scale).round() as u32;
            Ok(RasterizedPage {
                image: DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([255; 4]))),
                page_count: self.pages,
            })
        }
    }

    fn pdf_file() -> SelectedFile {
        SelectedFile {
            name: "report.pdf".into(),
            kind: MediaKind::Pdf,
            bytes: b"%PDF-1.7".to_vec(),
        }
    }

    #[tokio::test]
    async fn conversion_is_named_and_scaled() {
        let config = ScanConfig::default();
        let out = convert_pdf_to_jpeg(&pdf_file(), Arc::new(SolidRasterizer { pages: 4 }), &config)
            .await
            .unwrap();
        assert_eq!(out.file.name, "converted.jpg");
        assert_eq!(out.file.media_type(), "image/jpeg");
        assert_eq!((out.width, out.height), (60, 90));
        assert_eq!(out.page_count, 4);
        assert_eq!(&out.file.bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn fresh_form_cannot_submit() {
        let form = ScanForm::new(ScanConfig::default()).unwrap();
        assert_eq!(form.state(), &UiState::Idle);
        assert!(!form.can_submit());
    }

    #[test]
    fn invalid_selection_clears_previous_file() {
        let mut form = ScanForm::new(ScanConfig::default()).unwrap();
        form.select_file(PickedFile::new("a.jpg", "image/jpeg", vec![1]))
            .unwrap();
        assert!(form.can_submit());

        let err = form
            .select_file(PickedFile::new("a.gif", "image/gif", vec![2]))
            .unwrap_err();
        assert!(matches!(err, ScanError::InvalidFileType { .. }));
        assert!(form.selected().is_none());
        assert!(!form.can_submit());
        assert_eq!(
            form.state().error(),
            Some("Please upload a valid JPG or PDF file.")
        );
    }

    #[tokio::test]
    async fn submit_without_file_stays_out_of_loading() {
        let mut form = ScanForm::new(ScanConfig::default()).unwrap();
        let err = form.submit().await.unwrap_err();
        assert!(matches!(err, ScanError::NoFileSelected));
        assert_eq!(form.state().error(), Some("Please select a file to upload."));
    }

    #[test]
    fn explicit_renderer_wins() {
        let r: Arc<dyn PageRasterizer> = Arc::new(SolidRasterizer { pages: 1 });
        let config = ScanConfig::builder()
            .renderer(Arc::clone(&r))
            .renderer_library_path("/nowhere")
            .build()
            .unwrap();
        let resolved = resolve_rasterizer(&config);
        assert!(Arc::ptr_eq(&resolved, &r));
    }
}
