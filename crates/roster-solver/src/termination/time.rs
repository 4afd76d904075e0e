//! Wall-clock budget.

use std::time::Duration;

use super::Termination;
use crate::scope::SearchScope;
use crate::stats::TerminationReason;

/// Fires once the search has run for `limit`.
///
/// A search that has not started yet never times out.
#[derive(Debug, Clone)]
pub struct TimeTermination {
    limit: Duration,
}

impl TimeTermination {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    pub fn millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn seconds(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }
}

impl Termination for TimeTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        match scope.elapsed() {
            Some(elapsed) => elapsed >= self.limit,
            None => false,
        }
    }

    fn reason(&self, _scope: &SearchScope) -> TerminationReason {
        TerminationReason::TimeLimit
    }
}
