//! Termination conditions for a search.

mod composite;
mod external;
mod node_count;
mod time;

use std::fmt::Debug;

use crate::scope::SearchScope;
use crate::stats::TerminationReason;

pub use composite::OrTermination;
pub use external::ExternalTermination;
pub use node_count::NodeCountTermination;
pub use time::TimeTermination;

/// Trait for determining when to stop searching.
pub trait Termination: Send + Debug {
    /// Returns true if searching should terminate.
    fn is_terminated(&self, scope: &SearchScope) -> bool;

    /// The reason reported once this termination has fired.
    fn reason(&self, scope: &SearchScope) -> TerminationReason;
}

/// An absent limit never terminates.
impl<T: Termination> Termination for Option<T> {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        self.as_ref().is_some_and(|t| t.is_terminated(scope))
    }

    fn reason(&self, scope: &SearchScope) -> TerminationReason {
        match self {
            Some(t) => t.reason(scope),
            None => TerminationReason::Exhausted,
        }
    }
}

#[cfg(test)]
mod tests;
