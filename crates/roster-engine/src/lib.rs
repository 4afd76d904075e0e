//! Roster Engine - the scheduling pipeline stages
//!
//! Each stage is a plain function over explicit inputs:
//!
//! 1. [`normalize`] validates configuration and submissions into a [`SchedulingInput`]
//! 2. [`build_model`] derives variables and hard constraints
//! 3. [`compose_objective`] builds the weighted cost function
//! 4. [`invoke`] runs a [`Backend`](roster_solver::Backend) and interprets its status
//! 5. [`extract`] maps solved values back to a [`Schedule`](roster_core::Schedule)
//! 6. [`narrative`] renders per-slot text summaries
//!
//! [`stats`] aggregates finished schedules for reporting.

pub mod builder;
pub mod extract;
pub mod invoke;
pub mod narrative;
pub mod normalize;
pub mod objective;
pub mod stats;

pub use builder::{build_model, AssignmentKey, BuiltModel, ModelStats, VariableArena};
pub use extract::{extract, AssignedEmployee, Extraction, RoleCoverage, SlotCoverage};
pub use invoke::{invoke, InvocationOutcome, SolveLifecycle, SolvePhase, SolveQuality, SolvedState};
pub use normalize::{normalize, NormalizedEmployee, RoleRequirement, SchedulingInput};
pub use objective::{compose_objective, ComposedObjective, ObjectiveBreakdown, TermValue};
pub use stats::{RoleTally, RosterStatistics};
