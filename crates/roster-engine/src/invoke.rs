//! Solver invocation and the solve lifecycle.

use std::fmt;

use roster_core::{Result, RosterError};
use roster_solver::{
    Backend, BackendStatus, LinearModel, SearchStatistics, SolveLimits, TerminationReason,
};
use serde::Serialize;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveQuality {
    /// Proven optimal.
    Optimal,
    /// Best found before the budget ran out.
    Feasible,
}

impl fmt::Display for SolveQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveQuality::Optimal => write!(f, "optimal"),
            SolveQuality::Feasible => write!(f, "feasible"),
        }
    }
}

/// Lifecycle of one solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolvePhase {
    Building,
    Solving,
    Solved(SolveQuality),
    TimedOutNoSolution,
    ModelError,
}

impl SolvePhase {
    pub fn is_terminal(self) -> bool {
        !matches!(self, SolvePhase::Building | SolvePhase::Solving)
    }

    fn can_become(self, next: SolvePhase) -> bool {
        match (self, next) {
            (SolvePhase::Building, SolvePhase::Solving | SolvePhase::ModelError) => true,
            (SolvePhase::Solving, next) => next.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for SolvePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolvePhase::Building => write!(f, "BUILDING"),
            SolvePhase::Solving => write!(f, "SOLVING"),
            SolvePhase::Solved(SolveQuality::Optimal) => write!(f, "SOLVED(optimal)"),
            SolvePhase::Solved(SolveQuality::Feasible) => write!(f, "SOLVED(feasible)"),
            SolvePhase::TimedOutNoSolution => write!(f, "TIMED_OUT_NO_SOLUTION"),
            SolvePhase::ModelError => write!(f, "MODEL_ERROR"),
        }
    }
}

/// Tracks and logs phase transitions; starts in `Building`.
#[derive(Debug, Clone)]
pub struct SolveLifecycle {
    phase: SolvePhase,
    history: Vec<SolvePhase>,
}

impl Default for SolveLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl SolveLifecycle {
    pub fn new() -> Self {
        Self {
            phase: SolvePhase::Building,
            history: vec![SolvePhase::Building],
        }
    }

    pub fn phase(&self) -> SolvePhase {
        self.phase
    }

    /// Every phase visited, in order.
    pub fn history(&self) -> &[SolvePhase] {
        &self.history
    }

    pub fn advance(&mut self, next: SolvePhase) -> Result<()> {
        if !self.phase.can_become(next) {
            return Err(RosterError::Internal(format!(
                "illegal solve transition {} -> {}",
                self.phase, next
            )));
        }
        info!(event = "solve_phase", from = %self.phase, to = %next);
        self.phase = next;
        self.history.push(next);
        Ok(())
    }

    /// Marks a model construction failure and passes the error through.
    pub fn fail(&mut self, err: RosterError) -> RosterError {
        if self.phase.can_become(SolvePhase::ModelError) {
            self.phase = SolvePhase::ModelError;
            self.history.push(SolvePhase::ModelError);
        }
        error!(event = "solve_failed", error = %err);
        err
    }
}

/// A solved assignment.
#[derive(Debug, Clone)]
pub struct SolvedState {
    pub values: Vec<i64>,
    pub objective: i64,
    pub quality: SolveQuality,
    pub statistics: SearchStatistics,
}

#[derive(Debug, Clone)]
pub enum InvocationOutcome {
    Solved(SolvedState),
    /// The budget ran out before any assignment was found.
    TimedOut(SearchStatistics),
}

/// Runs `backend` on `model` and interprets its status.
///
/// An `Infeasible` status is a modelling defect, since shortage slack always
/// admits the all-idle assignment. A search stopped by its cancellation flag
/// yields [`RosterError::Cancelled`] whether or not it had an incumbent.
pub fn invoke(
    lifecycle: &mut SolveLifecycle,
    model: &LinearModel,
    backend: &dyn Backend,
    limits: &SolveLimits,
) -> Result<InvocationOutcome> {
    lifecycle.advance(SolvePhase::Solving)?;
    info!(
        event = "solve_start",
        backend = backend.name(),
        variables = model.variable_count(),
        constraints = model.constraint_count(),
    );

    let result = backend.solve(model, limits);
    let statistics = result.statistics.clone();
    info!(
        event = "solve_end",
        status = %result.status,
        objective = result.objective,
        nodes = statistics.nodes,
        duration_ms = statistics.elapsed.as_millis() as u64,
    );

    if statistics.termination == TerminationReason::Cancelled {
        return Err(RosterError::Cancelled);
    }

    match (result.status, result.values, result.objective) {
        (BackendStatus::Optimal | BackendStatus::Feasible, Some(values), Some(objective)) => {
            let quality = if result.status == BackendStatus::Optimal {
                SolveQuality::Optimal
            } else {
                SolveQuality::Feasible
            };
            lifecycle.advance(SolvePhase::Solved(quality))?;
            Ok(InvocationOutcome::Solved(SolvedState {
                values,
                objective,
                quality,
                statistics,
            }))
        }
        (BackendStatus::TimeoutNoProof, _, _) => {
            lifecycle.advance(SolvePhase::TimedOutNoSolution)?;
            Ok(InvocationOutcome::TimedOut(statistics))
        }
        (BackendStatus::Infeasible, _, _) => {
            lifecycle.advance(SolvePhase::ModelError)?;
            Err(RosterError::SolverInternalInfeasible {
                nodes: statistics.nodes,
            })
        }
        (status, _, _) => {
            lifecycle.advance(SolvePhase::ModelError)?;
            Err(RosterError::Internal(format!(
                "backend reported {status} without an assignment"
            )))
        }
    }
}
