//! Input: the file picker.
//!
//! A [`PickedFile`] is whatever the user chose, with the media type the
//! picker declared for it. Only a picked file whose declared type is exactly
//! `image/jpeg` or `application/pdf` becomes a [`SelectedFile`]; the content
//! bytes are never sniffed. Paths get their declared type from the extension,
//! the same way a browser file input reports `File.type`.

use crate::error::ScanError;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const MEDIA_TYPE_JPEG: &str = "image/jpeg";
pub const MEDIA_TYPE_PDF: &str = "application/pdf";
const MEDIA_TYPE_UNKNOWN: &str = "application/octet-stream";

/// Extensions offered by the picker.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "pdf"];

/// A file as handed over by the picker, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedFile {
    pub name: String,
    /// Declared media type; compared case-sensitively.
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl PickedFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }
}

/// The two accepted kinds of upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Jpeg,
    Pdf,
}

impl MediaKind {
    /// Exact, case-sensitive match on the declared media type.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        match media_type {
            MEDIA_TYPE_JPEG => Some(MediaKind::Jpeg),
            MEDIA_TYPE_PDF => Some(MediaKind::Pdf),
            _ => None,
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            MediaKind::Jpeg => MEDIA_TYPE_JPEG,
            MediaKind::Pdf => MEDIA_TYPE_PDF,
        }
    }
}

/// A validated file, ready to submit.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub kind: MediaKind,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn media_type(&self) -> &'static str {
        self.kind.media_type()
    }
}

impl TryFrom<PickedFile> for SelectedFile {
    type Error = ScanError;

    fn try_from(picked: PickedFile) -> Result<Self, Self::Error> {
        match MediaKind::from_media_type(&picked.media_type) {
            Some(kind) => Ok(SelectedFile {
                name: picked.name,
                kind,
                bytes: picked.bytes,
            }),
            None => Err(ScanError::InvalidFileType {
                name: picked.name,
                media_type: picked.media_type,
            }),
        }
    }
}

/// Media type a browser picker would declare for this path.
pub fn declared_media_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => MEDIA_TYPE_JPEG,
        Some("pdf") => MEDIA_TYPE_PDF,
        _ => MEDIA_TYPE_UNKNOWN,
    }
}

/// Read a local file into a [`PickedFile`].
///
/// `media_type` overrides the extension-derived type when given.
pub async fn pick_file(path: &Path, media_type: Option<&str>) -> Result<PickedFile, ScanError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| read_error(path, e))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let media_type = media_type
        .map(str::to_string)
        .unwrap_or_else(|| declared_media_type(path).to_string());

    debug!(
        "Picked '{}' ({}, {} bytes)",
        name,
        media_type,
        bytes.len()
    );
    Ok(PickedFile {
        name,
        media_type,
        bytes,
    })
}

fn read_error(path: &Path, e: std::io::Error) -> ScanError {
    let path: PathBuf = path.to_path_buf();
    match e.kind() {
        std::io::ErrorKind::NotFound => ScanError::FileNotFound { path },
        std::io::ErrorKind::PermissionDenied => ScanError::PermissionDenied { path },
        _ => ScanError::ReadFailed { path, source: e },
    }
}
