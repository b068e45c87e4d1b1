//! Pipeline stages for one document scan.
//!
//! Each submodule implements exactly one step, so each is testable alone
//! and the rendering backend can be swapped without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ encode ──▶ upload
//! (picker)  (pdfium)   (JPEG)     (multipart POST)
//!             └── PDF only ──┘
//! ```
//!
//! 1. [`input`]  — read the picked file and validate its declared media type
//! 2. [`render`] — rasterise page 1 of a PDF; runs in `spawn_blocking`
//!    because pdfium is not async-safe
//! 3. [`encode`] — flatten to RGB and JPEG-encode the rendered page
//! 4. [`upload`] — POST the image and read the service envelope; the only
//!    stage with network I/O

pub mod encode;
pub mod input;
pub mod render;
pub mod upload;
