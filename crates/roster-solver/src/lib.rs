//! Roster Solver - the constraint-optimization capability
//!
//! This crate defines the contract between model construction and the
//! solving engine, and ships a native engine implementing it:
//! - `model`: an arena of boolean and bounded-integer variables with linear
//!   constraints and a linear objective to minimize
//! - `backend`: the [`Backend`] trait and its status contract
//!   (optimal, feasible, infeasible, timeout without proof)
//! - `termination`: stop conditions for a search (time, node count, external flag)
//! - `bnb`: a depth-first branch-and-bound backend with bound propagation
//!
//! Logging levels:
//! - **INFO**: Search start/end with status and statistics
//! - **DEBUG**: Incumbent improvements
//! - **TRACE**: Root propagation detail

pub mod backend;
pub mod bnb;
pub mod model;
pub mod scope;
pub mod stats;
pub mod termination;

pub use backend::{Backend, BackendResult, BackendStatus, SolveLimits};
pub use bnb::{BranchAndBound, BranchAndBoundConfig};
pub use model::{
    LinearConstraint, LinearExpr, LinearModel, ModelError, Relation, VarId, VarKind, Variable,
    MAX_OBJECTIVE_MAGNITUDE,
};
pub use scope::SearchScope;
pub use stats::{SearchStatistics, TerminationReason};
pub use termination::{
    ExternalTermination, NodeCountTermination, OrTermination, Termination, TimeTermination,
};
