//! Search statistics reported alongside every backend result.

use std::fmt;
use std::time::Duration;

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The search tree was fully explored.
    Exhausted,
    TimeLimit,
    NodeLimit,
    /// An external cancellation flag was raised.
    Cancelled,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::Exhausted => write!(f, "exhausted"),
            TerminationReason::TimeLimit => write!(f, "time limit"),
            TerminationReason::NodeLimit => write!(f, "node limit"),
            TerminationReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStatistics {
    pub nodes: u64,
    pub solutions: u64,
    pub elapsed: Duration,
    pub termination: TerminationReason,
}

impl Default for SearchStatistics {
    fn default() -> Self {
        Self {
            nodes: 0,
            solutions: 0,
            elapsed: Duration::ZERO,
            termination: TerminationReason::Exhausted,
        }
    }
}
