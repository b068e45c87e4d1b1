//! Values produced by a scan: the OCR payload and the converted upload image.

use crate::pipeline::input::SelectedFile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The OCR payload returned by the service inside a successful envelope.
///
/// Kept verbatim; field names follow the service's camelCase JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResult {
    /// Short natural-language caption of the image.
    pub caption_result: String,
    /// Caption confidence, as sent by the service.
    pub confidence: Confidence,
    /// Full extracted text.
    pub read_result: String,
}

/// Confidence score. The service sends either a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Confidence {
    Number(f64),
    Text(String),
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Number(n) => write!(f, "{n}"),
            Confidence::Text(s) => f.write_str(s),
        }
    }
}

/// A PDF's first page rasterised and re-encoded as JPEG.
///
/// Lives for one submission only.
#[derive(Debug, Clone)]
pub struct ConvertedImage {
    /// Always `converted.jpg`, `image/jpeg`.
    pub file: SelectedFile,
    /// Pages in the source document; only the first was rendered.
    pub page_count: usize,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_confidence() {
        let r: OcrResult = serde_json::from_str(
            r#"{"captionResult":"A cat","confidence":0.97,"readResult":"hello"}"#,
        )
        .unwrap();
        assert_eq!(r.caption_result, "A cat");
        assert_eq!(r.confidence, Confidence::Number(0.97));
        assert_eq!(r.read_result, "hello");
        assert_eq!(r.confidence.to_string(), "0.97");
    }

    #[test]
    fn parses_string_confidence() {
        let r: OcrResult = serde_json::from_str(
            r#"{"captionResult":"a receipt","confidence":"high","readResult":"TOTAL 4.20"}"#,
        )
        .unwrap();
        assert_eq!(r.confidence, Confidence::Text("high".into()));
        assert_eq!(r.confidence.to_string(), "high");
    }

    #[test]
    fn serialises_with_service_field_names() {
        let r = OcrResult {
            caption_result: "x".into(),
            confidence: Confidence::Number(1.0),
            read_result: "y".into(),
        };
        let v = serde_json::to_value(&r).unwrap();
        assert!(v.get("captionResult").is_some());
        assert!(v.get("readResult").is_some());
    }
}
