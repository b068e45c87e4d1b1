//! Upload: one multipart POST to the OCR service, then read its envelope.
//!
//! The request carries a single part named `document`. The reply is an
//! envelope `{ "result": bool, "response": { … } }`:
//!
//! * transport error, non-2xx status or a non-JSON body → hard failure
//!   ([`ScanError::SubmissionFailure`]);
//! * JSON with a falsy `result` → [`ScanError::ServiceRejected`];
//! * truthy `result` → `response` read as [`OcrResult`]. If that does not
//!   parse the reply is malformed, which is again a hard failure.
//!
//! There is no retry. The request runs until the service answers or the
//! connection fails (or the optional timeout fires).

use crate::error::ScanError;
use crate::output::OcrResult;
use crate::pipeline::input::SelectedFile;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Multipart field carrying the image.
pub const DOCUMENT_FIELD: &str = "document";

/// Build the HTTP client used for uploads.
pub fn build_client(timeout_secs: Option<u64>) -> Result<reqwest::Client, ScanError> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| ScanError::InvalidConfig(format!("HTTP client: {}", e)))
}

/// POST `file` to `endpoint` and return the parsed JSON body.
pub async fn post_document(
    client: &reqwest::Client,
    endpoint: &str,
    file: &SelectedFile,
) -> Result<Value, ScanError> {
    let failure = |detail: String| ScanError::SubmissionFailure {
        endpoint: endpoint.to_string(),
        detail,
    };

    let part = Part::bytes(file.bytes.clone())
        .file_name(file.name.clone())
        .mime_str(file.media_type())
        .map_err(|e| failure(e.to_string()))?;
    let form = Form::new().part(DOCUMENT_FIELD, part);

    info!(
        "Uploading '{}' ({} bytes) to {}",
        file.name,
        file.bytes.len(),
        endpoint
    );

    let response = client
        .post(endpoint)
        .multipart(form)
        .send()
        .await
        .map_err(|e| failure(error_chain(&e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(failure(format!("HTTP {}", status)));
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| failure(format!("response is not JSON: {}", error_chain(&e))))?;
    debug!("Service answered HTTP {}", status);
    Ok(body)
}

/// `err` and every `source()` below it, joined with `": "`.
///
/// reqwest's own message is only "error sending request for url …"; the
/// cause that matters (refused, reset, timed out) sits further down.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let msg = cause.to_string();
        if !detail.ends_with(&msg) {
            detail.push_str(": ");
            detail.push_str(&msg);
        }
        source = cause.source();
    }
    detail
}

/// Read the service envelope.
pub fn interpret_envelope(envelope: Value, endpoint: &str) -> Result<OcrResult, ScanError> {
    let accepted = envelope.get("result").map(is_truthy).unwrap_or(false);
    if !accepted {
        return Err(ScanError::ServiceRejected);
    }

    let payload = envelope.get("response").cloned().unwrap_or(Value::Null);
    serde_json::from_value(payload).map_err(|e| ScanError::SubmissionFailure {
        endpoint: endpoint.to_string(),
        detail: format!("malformed response payload: {}", e),
    })
}

/// JSON truthiness: `false`, `null`, `0`, `""` are falsy.
fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Confidence;
    use serde_json::json;

    const EP: &str = "http://localhost/scan";

    #[test]
    fn accepted_envelope_yields_payload() {
        let env = json!({
            "result": true,
            "response": {"captionResult": "A cat", "confidence": 0.97, "readResult": "hello"}
        });
        let r = interpret_envelope(env, EP).unwrap();
        assert_eq!(r.caption_result, "A cat");
        assert_eq!(r.confidence, Confidence::Number(0.97));
        assert_eq!(r.read_result, "hello");
    }

    #[test]
    fn false_result_is_rejection() {
        let err = interpret_envelope(json!({"result": false}), EP).unwrap_err();
        assert!(matches!(err, ScanError::ServiceRejected));
    }

    #[test]
    fn missing_or_falsy_result_is_rejection() {
        for env in [
            json!({}),
            json!({"result": null}),
            json!({"result": 0}),
            json!({"result": ""}),
            json!([1, 2, 3]),
            json!("ok"),
        ] {
            let err = interpret_envelope(env.clone(), EP).unwrap_err();
            assert!(matches!(err, ScanError::ServiceRejected), "env: {env}");
        }
    }

    #[test]
    fn truthy_non_bool_result_is_accepted() {
        let env = json!({
            "result": 1,
            "response": {"captionResult": "", "confidence": "n/a", "readResult": ""}
        });
        assert!(interpret_envelope(env, EP).is_ok());
    }

    #[test]
    fn accepted_but_malformed_payload_is_hard_failure() {
        let err = interpret_envelope(json!({"result": true}), EP).unwrap_err();
        assert!(err.is_hard_failure());

        let err = interpret_envelope(
            json!({"result": true, "response": {"captionResult": 3}}),
            EP,
        )
        .unwrap_err();
        assert!(matches!(err, ScanError::SubmissionFailure { .. }));
    }

    #[derive(Debug, thiserror::Error)]
    #[error("error sending request")]
    struct SendError(#[source] std::io::Error);

    #[test]
    fn error_chain_keeps_the_underlying_cause() {
        let err = SendError(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        ));
        assert_eq!(
            error_chain(&err),
            "error sending request: connection reset by peer"
        );
    }

    #[test]
    fn error_chain_of_a_leaf_is_its_message() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        assert_eq!(error_chain(&err), "boom");
    }

    #[test]
    fn client_builds_with_and_without_timeout() {
        assert!(build_client(None).is_ok());
        assert!(build_client(Some(5)).is_ok());
    }
}
