//! Observer trait for form state changes.
//!
//! Inject an [`Arc<dyn ScanObserver>`] via
//! [`crate::config::ScanConfigBuilder::observer`] to follow a submission as
//! it moves through [`UiState::Loading`] into its terminal state. The CLI uses
//! this to drive its busy spinner; a GUI would re-render on every call.
//!
//! # Example
//!
//! ```rust
//! use docscan::{ScanConfig, ScanObserver, UiState};
//! use std::sync::Arc;
//!
//! struct PrintObserver;
//!
//! impl ScanObserver for PrintObserver {
//!     fn on_state_change(&self, state: &UiState) {
//!         eprintln!("state: {state:?}");
//!     }
//! }
//!
//! let config = ScanConfig::builder()
//!     .observer(Arc::new(PrintObserver) as Arc<dyn ScanObserver>)
//!     .build()
//!     .unwrap();
//! ```

use crate::state::UiState;
use std::sync::Arc;

/// Receives form events. All methods default to no-ops.
pub trait ScanObserver: Send + Sync {
    /// Called after every state transition, with the new state.
    fn on_state_change(&self, state: &UiState) {
        let _ = state;
    }

    /// Called when a PDF with more than one page is about to be uploaded as
    /// its first page only.
    fn on_first_page_only(&self, page_count: usize) {
        let _ = page_count;
    }
}

/// Used when no observer is configured.
pub struct NoopObserver;

impl ScanObserver for NoopObserver {}

/// Convenience alias matching the type stored in [`crate::config::ScanConfig`].
pub type SharedObserver = Arc<dyn ScanObserver>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct RecordingObserver {
        states: Mutex<Vec<UiState>>,
        truncated: AtomicUsize,
    }

    impl ScanObserver for RecordingObserver {
        fn on_state_change(&self, state: &UiState) {
            self.states.lock().unwrap().push(state.clone());
        }

        fn on_first_page_only(&self, page_count: usize) {
            self.truncated.store(page_count, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_observer_does_not_panic() {
        let obs = NoopObserver;
        obs.on_state_change(&UiState::Loading);
        obs.on_first_page_only(7);
    }

    #[test]
    fn recording_observer_keeps_order() {
        let obs = RecordingObserver {
            states: Mutex::new(Vec::new()),
            truncated: AtomicUsize::new(0),
        };
        obs.on_state_change(&UiState::Loading);
        obs.on_first_page_only(3);
        obs.on_state_change(&UiState::Error("x".into()));

        let states = obs.states.lock().unwrap();
        assert_eq!(*states, vec![UiState::Loading, UiState::Error("x".into())]);
        assert_eq!(obs.truncated.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn arc_dyn_observer_works() {
        let obs: SharedObserver = Arc::new(NoopObserver);
        obs.on_state_change(&UiState::Idle);
    }
}
