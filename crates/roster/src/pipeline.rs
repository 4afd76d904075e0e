//! The one-call scheduling pipeline.
//!
//! `normalize -> build -> compose -> invoke -> extract -> narrate`, executed
//! as one unit of work over an immutable request snapshot.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use roster_config::SolverConfig;
use roster_core::{EmployeeSubmission, Result, RosterError, Schedule, ScheduleConfig};
use roster_engine::{
    build_model, compose_objective, extract, invoke, narrative, normalize, InvocationOutcome,
    ModelStats, ObjectiveBreakdown, SolveLifecycle, SolveQuality,
};
use roster_solver::{Backend, SearchStatistics, SolveLimits, TerminationReason};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

/// Configuration snapshot plus the submissions to schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub config: ScheduleConfig,
    pub submissions: Vec<EmployeeSubmission>,
}

impl ScheduleRequest {
    pub fn new(config: ScheduleConfig, submissions: Vec<EmployeeSubmission>) -> Self {
        Self {
            config,
            submissions,
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// SHA-256 of the canonical JSON encoding, hex encoded.
    ///
    /// Maps and skill sets serialize in sorted order, so equal requests
    /// always share a fingerprint.
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|e| RosterError::Internal(format!("cannot encode request: {e}")))?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}

/// A schedule together with everything known about how it was found.
#[derive(Debug, Clone)]
pub struct SolvedSchedule {
    pub schedule: Schedule,
    /// One text block per slot.
    pub narrative: Vec<String>,
    pub breakdown: ObjectiveBreakdown,
    pub objective: i64,
    pub quality: SolveQuality,
    pub statistics: SearchStatistics,
    pub model_stats: ModelStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoScheduleReason {
    SolverTimeoutNoSolution,
}

/// Why no schedule was produced, with enough detail to adjust the budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoScheduleReport {
    pub reason: NoScheduleReason,
    pub time_limit: Duration,
    pub node_limit: Option<u64>,
    pub nodes_explored: u64,
    pub hint: String,
}

#[derive(Debug, Clone)]
pub enum ScheduleOutcome {
    /// A schedule, possibly with shortages.
    Scheduled(SolvedSchedule),
    /// The budget ran out before any schedule was found.
    NoSchedule(NoScheduleReport),
}

impl ScheduleOutcome {
    pub fn scheduled(&self) -> Option<&SolvedSchedule> {
        match self {
            ScheduleOutcome::Scheduled(solved) => Some(solved),
            ScheduleOutcome::NoSchedule(_) => None,
        }
    }

    pub fn no_schedule(&self) -> Option<&NoScheduleReport> {
        match self {
            ScheduleOutcome::Scheduled(_) => None,
            ScheduleOutcome::NoSchedule(report) => Some(report),
        }
    }
}

/// Search limits derived from a solver configuration.
pub fn limits_for(config: &SolverConfig) -> SolveLimits {
    SolveLimits {
        time_limit: Some(config.time_limit()),
        node_limit: config.search.node_limit,
        terminate_flag: None,
    }
}

/// Runs the whole pipeline for one request.
///
/// Input errors surface before any variable is built. Running out of budget
/// without a schedule is [`ScheduleOutcome::NoSchedule`], not an error.
pub fn solve_schedule(
    request: &ScheduleRequest,
    config: &SolverConfig,
    backend: &dyn Backend,
) -> Result<ScheduleOutcome> {
    run(request, config, backend, None)
}

/// As [`solve_schedule`], observing `cancel` for cooperative cancellation.
pub(crate) fn run(
    request: &ScheduleRequest,
    config: &SolverConfig,
    backend: &dyn Backend,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<ScheduleOutcome> {
    let mut lifecycle = SolveLifecycle::new();
    let input = normalize(&request.config, &request.submissions).map_err(|e| lifecycle.fail(e))?;
    let mut built = build_model(&input).map_err(|e| lifecycle.fail(e))?;
    let objective =
        compose_objective(&input, &built.arena, &config.weights).map_err(|e| lifecycle.fail(e))?;
    objective
        .install(&mut built.model)
        .map_err(|e| lifecycle.fail(e))?;

    let mut limits = limits_for(config);
    limits.terminate_flag = cancel;

    match invoke(&mut lifecycle, &built.model, backend, &limits)? {
        InvocationOutcome::Solved(state) => {
            let extraction = extract(&input, &built.arena, &state.values, config.shift_length_hours)?;
            let narrative = narrative::render(&extraction.coverage);
            let breakdown = ObjectiveBreakdown::evaluate(&objective, &state.values);
            info!(
                event = "schedule_ready",
                quality = ?state.quality,
                objective = state.objective,
                shortage = extraction.schedule.total_shortage(),
            );
            Ok(ScheduleOutcome::Scheduled(SolvedSchedule {
                schedule: extraction.schedule,
                narrative,
                breakdown,
                objective: state.objective,
                quality: state.quality,
                statistics: state.statistics,
                model_stats: built.stats,
            }))
        }
        InvocationOutcome::TimedOut(statistics) => {
            let time_limit = config.time_limit();
            let hint = match statistics.termination {
                TerminationReason::NodeLimit => format!(
                    "no schedule found within {} search nodes; raise search.node_limit",
                    statistics.nodes
                ),
                _ => format!(
                    "no schedule found within {:.1}s; raise termination.seconds_spent_limit or reduce the roster",
                    time_limit.as_secs_f64()
                ),
            };
            info!(event = "no_schedule", nodes = statistics.nodes, hint = %hint);
            Ok(ScheduleOutcome::NoSchedule(NoScheduleReport {
                reason: NoScheduleReason::SolverTimeoutNoSolution,
                time_limit,
                node_limit: config.search.node_limit,
                nodes_explored: statistics.nodes,
                hint,
            }))
        }
    }
}
