//! Node count termination.

use super::Termination;
use crate::scope::SearchScope;
use crate::stats::TerminationReason;

/// Terminates after exploring a number of search nodes.
///
/// # Example
///
/// ```
/// use roster_solver::termination::NodeCountTermination;
///
/// // Terminate after 10 000 nodes
/// let term = NodeCountTermination::new(10_000);
/// ```
#[derive(Debug, Clone)]
pub struct NodeCountTermination {
    limit: u64,
}

impl NodeCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for NodeCountTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        scope.node_count() >= self.limit
    }

    fn reason(&self, _scope: &SearchScope) -> TerminationReason {
        TerminationReason::NodeLimit
    }
}
