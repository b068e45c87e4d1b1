//! # docscan
//!
//! Send a JPG or PDF to a document OCR service and get back a caption, a
//! confidence score and the extracted text.
//!
//! The OCR itself happens remotely. This crate owns the client side of the
//! exchange: validating the picked file, turning a PDF into a JPEG of its
//! first page, posting it as multipart form data, and mapping the reply (or
//! the failure) onto a single [`UiState`].
//!
//! ## Pipeline Overview
//!
//! ```text
//! file
//!  │
//!  ├─ 1. Select  declared type must be image/jpeg or application/pdf
//!  ├─ 2. Render  PDF only: page 1 at 1.5× via pdfium (spawn_blocking)
//!  ├─ 3. Encode  PDF only: JPEG, quality 90, named converted.jpg
//!  ├─ 4. Upload  multipart POST, single `document` part
//!  └─ 5. Show    Result(caption, confidence, text) or Error(message)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docscan::{ScanConfig, ScanForm, UiState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut form = ScanForm::new(ScanConfig::default())?;
//!     form.select_path(std::path::Path::new("receipt.pdf"), None).await?;
//!     let _ = form.submit().await;
//!     match form.state() {
//!         UiState::Result(r) => println!("{}\n{}\n{}", r.caption_result, r.confidence, r.read_result),
//!         UiState::Error(msg) => eprintln!("Error: {msg}"),
//!         _ => {}
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docscan` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod scan;
pub mod state;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ScanConfig, ScanConfigBuilder, DEFAULT_ENDPOINT_URL};
pub use error::ScanError;
pub use output::{Confidence, ConvertedImage, OcrResult};
pub use pipeline::input::{MediaKind, PickedFile, SelectedFile};
pub use pipeline::render::{PageRasterizer, PdfiumRasterizer, RasterizedPage};
pub use progress::{NoopObserver, ScanObserver, SharedObserver};
pub use scan::{convert_pdf_to_jpeg, scan, scan_sync, ScanForm};
pub use state::UiState;
