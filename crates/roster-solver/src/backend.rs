//! The backend contract.
//!
//! A backend takes an immutable [`LinearModel`] and returns one of four
//! statuses. `Optimal` and `Feasible` always carry a full assignment that
//! satisfies every constraint; `Infeasible` means the search proved no
//! assignment exists; `TimeoutNoProof` means the search stopped before
//! finding any assignment.

use std::fmt::{self, Debug};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use crate::model::{LinearModel, VarId};
use crate::stats::SearchStatistics;

/// A constraint-optimization engine.
pub trait Backend: Send + Sync + Debug {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Minimizes the model's objective within the given limits.
    fn solve(&self, model: &LinearModel, limits: &SolveLimits) -> BackendResult;
}

/// Resource limits for a single solve.
#[derive(Debug, Clone, Default)]
pub struct SolveLimits {
    pub time_limit: Option<Duration>,
    pub node_limit: Option<u64>,
    /// Raised by another thread to stop the search early.
    pub terminate_flag: Option<Arc<AtomicBool>>,
}

impl SolveLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    pub fn with_terminate_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate_flag = Some(flag);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    /// Best assignment with a proof of optimality.
    Optimal,
    /// Best assignment found before a limit was hit.
    Feasible,
    /// Proven that no assignment exists.
    Infeasible,
    /// Stopped before any assignment was found.
    TimeoutNoProof,
}

impl BackendStatus {
    pub fn has_solution(self) -> bool {
        matches!(self, BackendStatus::Optimal | BackendStatus::Feasible)
    }
}

impl fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendStatus::Optimal => write!(f, "optimal"),
            BackendStatus::Feasible => write!(f, "feasible"),
            BackendStatus::Infeasible => write!(f, "infeasible"),
            BackendStatus::TimeoutNoProof => write!(f, "timeout without solution"),
        }
    }
}

/// Outcome of [`Backend::solve`].
#[derive(Debug, Clone)]
pub struct BackendResult {
    pub status: BackendStatus,
    /// One value per model variable, present iff the status has a solution.
    pub values: Option<Vec<i64>>,
    pub objective: Option<i64>,
    pub statistics: SearchStatistics,
}

impl BackendResult {
    pub fn value(&self, var: VarId) -> Option<i64> {
        self.values.as_ref()?.get(var.index()).copied()
    }

    /// Reads a boolean variable; unknown values read as false.
    pub fn is_true(&self, var: VarId) -> bool {
        self.value(var).is_some_and(|v| v != 0)
    }
}
