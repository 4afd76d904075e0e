//! Cancellation raised from outside the search.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::Termination;
use crate::scope::SearchScope;
use crate::stats::TerminationReason;

/// Fires when a shared cancel flag is raised.
///
/// The service hands the same flag to the backend and keeps a clone so a
/// job can be cancelled while its search runs on another thread.
///
/// ```
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use roster_solver::{SearchScope, Termination};
/// use roster_solver::termination::ExternalTermination;
///
/// let cancel = Arc::new(AtomicBool::new(false));
/// let termination = ExternalTermination::new(Arc::clone(&cancel));
/// let scope = SearchScope::new();
///
/// assert!(!termination.is_terminated(&scope));
/// cancel.store(true, Ordering::SeqCst);
/// assert!(termination.is_terminated(&scope));
/// ```
#[derive(Debug, Clone)]
pub struct ExternalTermination {
    cancel: Arc<AtomicBool>,
}

impl ExternalTermination {
    pub fn new(cancel: Arc<AtomicBool>) -> Self {
        Self { cancel }
    }
}

impl Termination for ExternalTermination {
    fn is_terminated(&self, _scope: &SearchScope) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    fn reason(&self, _scope: &SearchScope) -> TerminationReason {
        TerminationReason::Cancelled
    }
}
