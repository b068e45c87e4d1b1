//! Error types for the docscan library.
//!
//! A single [`ScanError`] enum covers every way a scan can fail. Five of its
//! variants form the user-facing taxonomy of the upload form:
//!
//! * [`ScanError::InvalidFileType`] — rejected at selection time.
//! * [`ScanError::NoFileSelected`] — submit pressed with nothing picked.
//! * [`ScanError::ConversionFailure`] — the PDF could not be rasterised or
//!   encoded. Never shown as such; it collapses into the generic message.
//! * [`ScanError::ServiceRejected`] — the service answered with `result: false`.
//! * [`ScanError::SubmissionFailure`] — network, HTTP status or body failure.
//!
//! The remaining variants are plumbing (reading the file, binding pdfium,
//! validating config). [`ScanError::user_message`] maps every variant to the
//! exact text that ends up in [`crate::state::UiState::Error`]; the detailed
//! `Display` output is for logs only.

use std::path::PathBuf;
use thiserror::Error;

/// Shown when the picked file is neither a JPEG nor a PDF.
pub const MSG_INVALID_FILE_TYPE: &str = "Please upload a valid JPG or PDF file.";
/// Shown when submit is attempted with no file selected.
pub const MSG_NO_FILE_SELECTED: &str = "Please select a file to upload.";
/// Shown when the service answers but flags the document as unprocessable.
pub const MSG_SERVICE_REJECTED: &str = "Failed to process the document.";
/// Shown for every other failure during a submission.
pub const MSG_SUBMISSION_FAILURE: &str = "An error occurred while processing the document.";

/// All errors returned by the docscan library.
#[derive(Debug, Error)]
pub enum ScanError {
    // ── Selection errors ──────────────────────────────────────────────────
    /// The declared media type is not `image/jpeg` or `application/pdf`.
    #[error("Unsupported media type '{media_type}' for '{name}' (expected image/jpeg or application/pdf)")]
    InvalidFileType { name: String, media_type: String },

    /// Submit was requested while no file is selected.
    #[error("No file selected")]
    NoFileSelected,

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but reading its bytes failed.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Conversion errors ─────────────────────────────────────────────────
    /// PDF load, page render or JPEG encoding failed.
    #[error("PDF conversion failed: {detail}")]
    ConversionFailure { detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH (or --pdfium-lib) to a libpdfium file or the directory containing it,\n\
or install pdfium where the system loader can find it.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Service errors ────────────────────────────────────────────────────
    /// The service replied with a falsy `result` flag.
    #[error("OCR service rejected the document")]
    ServiceRejected,

    /// Network error, non-2xx status, or a body that is not a usable envelope.
    #[error("Upload to '{endpoint}' failed: {detail}")]
    SubmissionFailure { endpoint: String, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScanError {
    /// The text shown to the user for this error.
    ///
    /// Everything that can go wrong after a submission has started, other
    /// than an explicit rejection by the service, reads the same.
    pub fn user_message(&self) -> String {
        match self {
            ScanError::InvalidFileType { .. } => MSG_INVALID_FILE_TYPE.to_string(),
            ScanError::NoFileSelected => MSG_NO_FILE_SELECTED.to_string(),
            ScanError::ServiceRejected => MSG_SERVICE_REJECTED.to_string(),
            ScanError::ConversionFailure { .. }
            | ScanError::PdfiumBindingFailed(_)
            | ScanError::SubmissionFailure { .. }
            | ScanError::Internal(_) => MSG_SUBMISSION_FAILURE.to_string(),
            ScanError::FileNotFound { .. }
            | ScanError::PermissionDenied { .. }
            | ScanError::ReadFailed { .. }
            | ScanError::InvalidConfig(_) => self.to_string(),
        }
    }

    /// True for failures that occur after the network call may have started
    /// or during conversion, i.e. the ones whose detail must be logged.
    pub fn is_hard_failure(&self) -> bool {
        matches!(
            self,
            ScanError::ConversionFailure { .. }
                | ScanError::PdfiumBindingFailed(_)
                | ScanError::SubmissionFailure { .. }
                | ScanError::Internal(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_messages_are_exact() {
        let e = ScanError::InvalidFileType {
            name: "notes.txt".into(),
            media_type: "text/plain".into(),
        };
        assert_eq!(e.user_message(), "Please upload a valid JPG or PDF file.");
        assert_eq!(
            ScanError::NoFileSelected.user_message(),
            "Please select a file to upload."
        );
    }

    #[test]
    fn rejection_is_distinct_from_failure() {
        assert_eq!(
            ScanError::ServiceRejected.user_message(),
            "Failed to process the document."
        );
        assert!(!ScanError::ServiceRejected.is_hard_failure());
    }

    #[test]
    fn conversion_failure_collapses_to_generic() {
        let e = ScanError::ConversionFailure {
            detail: "bad xref".into(),
        };
        assert_eq!(
            e.user_message(),
            "An error occurred while processing the document."
        );
        assert!(e.is_hard_failure());
        // detail stays in the log text only
        assert!(e.to_string().contains("bad xref"));
        assert!(!e.user_message().contains("bad xref"));
    }

    #[test]
    fn submission_failure_display_names_endpoint() {
        let e = ScanError::SubmissionFailure {
            endpoint: "http://localhost:9/scan".into(),
            detail: "connection reset".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("localhost:9"), "got: {msg}");
        assert!(msg.contains("connection reset"), "got: {msg}");
        assert_eq!(e.user_message(), MSG_SUBMISSION_FAILURE);
    }
}
