//! The form's display state.
//!
//! One enum instead of independent `loading` / `error` / `result` flags, so
//! "showing an error and a result at once" cannot be represented.

use crate::output::OcrResult;

/// Exactly one of these is shown at any time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiState {
    /// Nothing to show: fresh form, or a file was just selected.
    #[default]
    Idle,
    /// A submission is in flight; submit is disabled.
    Loading,
    /// Error banner with a user-facing message.
    Error(String),
    /// The three result panels.
    Result(OcrResult),
}

impl UiState {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            UiState::Error(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&OcrResult> {
        match self {
            UiState::Result(r) => Some(r),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Confidence;

    #[test]
    fn accessors_are_exclusive() {
        let r = OcrResult {
            caption_result: "c".into(),
            confidence: Confidence::Number(0.5),
            read_result: "t".into(),
        };
        let s = UiState::Result(r.clone());
        assert_eq!(s.result(), Some(&r));
        assert!(s.error().is_none());
        assert!(!s.is_loading());

        let s = UiState::Error("boom".into());
        assert_eq!(s.error(), Some("boom"));
        assert!(s.result().is_none());
    }

    #[test]
    fn default_is_idle() {
        assert_eq!(UiState::default(), UiState::Idle);
    }
}
