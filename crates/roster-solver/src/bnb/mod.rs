//! Depth-first branch-and-bound backend.
//!
//! Explores the search tree one variable at a time in arena order, propagating
//! bounds after every branching decision. Each new incumbent tightens an
//! objective cut so later branches must strictly improve on it. When the tree
//! is exhausted the incumbent is proven optimal.

mod domains;
mod propagate;

use tracing::{debug, info, trace};

use crate::backend::{Backend, BackendResult, BackendStatus, SolveLimits};
use crate::model::{LinearModel, VarKind};
use crate::scope::SearchScope;
use crate::stats::{SearchStatistics, TerminationReason};
use crate::termination::{
    ExternalTermination, NodeCountTermination, OrTermination, Termination, TimeTermination,
};

use domains::{BoundChange, Domains};
use propagate::Propagator;

/// Configuration for the branch-and-bound backend.
#[derive(Debug, Clone)]
pub struct BranchAndBoundConfig {
    /// Whether incumbents prune the remaining tree.
    pub enable_pruning: bool,
}

impl Default for BranchAndBoundConfig {
    fn default() -> Self {
        Self {
            enable_pruning: true,
        }
    }
}

/// Native exhaustive backend.
///
/// # Example
///
/// ```
/// use roster_solver::{Backend, BackendStatus, BranchAndBound, LinearExpr, LinearModel, SolveLimits};
///
/// let mut model = LinearModel::new("cover");
/// let a = model.new_bool("a");
/// let b = model.new_bool("b");
/// model.add_ge("cover", LinearExpr::sum([a, b]), 1).unwrap();
/// model.minimize(LinearExpr::term(a, 4) + LinearExpr::term(b, 3)).unwrap();
///
/// let result = BranchAndBound::new().solve(&model, &SolveLimits::new());
/// assert_eq!(result.status, BackendStatus::Optimal);
/// assert_eq!(result.objective, Some(3));
/// assert_eq!(result.values, Some(vec![0, 1]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BranchAndBound {
    config: BranchAndBoundConfig,
}

impl BranchAndBound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BranchAndBoundConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BranchAndBoundConfig {
        &self.config
    }
}

impl Backend for BranchAndBound {
    fn name(&self) -> &'static str {
        "branch-and-bound"
    }

    fn solve(&self, model: &LinearModel, limits: &SolveLimits) -> BackendResult {
        let termination = OrTermination((
            limits.terminate_flag.clone().map(ExternalTermination::new),
            limits.time_limit.map(TimeTermination::new),
            limits.node_limit.map(NodeCountTermination::new),
        ));

        info!(
            event = "search_start",
            model = model.name(),
            variables = model.variable_count(),
            constraints = model.constraint_count(),
            time_limit_ms = limits.time_limit.map(|d| d.as_millis() as u64),
            node_limit = limits.node_limit,
        );

        let mut search = Search::new(model, termination, self.config.enable_pruning);
        let exhausted = search.run();
        let result = search.into_result(exhausted);

        info!(
            event = "search_end",
            model = model.name(),
            status = %result.status,
            objective = result.objective,
            nodes = result.statistics.nodes,
            solutions = result.statistics.solutions,
            duration_ms = result.statistics.elapsed.as_millis() as u64,
            termination = %result.statistics.termination,
        );
        result
    }
}

/// The pair of bound restrictions tried at a node, in order.
type Branches = [(i64, i64); 2];

struct Search<'m, T> {
    model: &'m LinearModel,
    domains: Domains,
    propagator: Propagator,
    termination: T,
    scope: SearchScope,
    objective_coeffs: Vec<i64>,
    best: Option<(Vec<i64>, i64)>,
    pruning: bool,
    stopped: bool,
}

impl<'m, T: Termination> Search<'m, T> {
    fn new(model: &'m LinearModel, termination: T, pruning: bool) -> Self {
        let mut objective_coeffs = vec![0; model.variable_count()];
        for (var, coeff) in model.objective().terms() {
            objective_coeffs[var.index()] += coeff;
        }
        Self {
            model,
            domains: Domains::new(model.variables().iter().map(|v| (v.lb, v.ub))),
            propagator: Propagator::new(model),
            termination,
            scope: SearchScope::new(),
            objective_coeffs,
            best: None,
            pruning,
            stopped: false,
        }
    }

    /// Returns true if the tree was fully explored.
    fn run(&mut self) -> bool {
        self.scope.start_solving();
        self.propagator.enqueue_all();
        if self.propagator.propagate(&mut self.domains).is_err() {
            trace!(
                event = "root_conflict",
                rows = self.propagator.row_count()
            );
            return true;
        }
        self.explore();
        !self.stopped
    }

    /// Returns false once a termination fires.
    fn explore(&mut self) -> bool {
        if self.termination.is_terminated(&self.scope) {
            self.stopped = true;
            return false;
        }
        self.scope.increment_node_count();

        if self.pruning && self.can_prune() {
            return true;
        }

        let Some(var) = self.select_variable() else {
            self.record_leaf();
            return true;
        };

        for (lb, ub) in self.branches(var) {
            let mark = self.domains.mark();
            if self.restrict(var, lb, ub) && self.propagator.propagate(&mut self.domains).is_ok() {
                let keep_going = self.explore();
                self.domains.undo_to(mark);
                if !keep_going {
                    return false;
                }
            } else {
                self.domains.undo_to(mark);
            }
        }
        true
    }

    fn can_prune(&self) -> bool {
        match &self.best {
            Some((_, best)) => self.objective_lower_bound() >= *best,
            None => false,
        }
    }

    fn objective_lower_bound(&self) -> i64 {
        self.objective_coeffs
            .iter()
            .enumerate()
            .filter(|(_, c)| **c != 0)
            .map(|(var, &c)| {
                if c > 0 {
                    c * self.domains.lb(var)
                } else {
                    c * self.domains.ub(var)
                }
            })
            .sum::<i64>()
            + self.model.objective().constant_value()
    }

    fn select_variable(&self) -> Option<usize> {
        (0..self.domains.len()).find(|&var| !self.domains.is_fixed(var))
    }

    /// Booleans try 1 first; integers start from the end the objective favours.
    fn branches(&self, var: usize) -> Branches {
        let lb = self.domains.lb(var);
        let ub = self.domains.ub(var);
        match self.model.variables()[var].kind {
            VarKind::Bool => [(ub, ub), (lb, lb)],
            VarKind::Int if self.objective_coeffs[var] < 0 => [(ub, ub), (lb, ub - 1)],
            VarKind::Int => [(lb, lb), (lb + 1, ub)],
        }
    }

    fn restrict(&mut self, var: usize, lb: i64, ub: i64) -> bool {
        let raised = self.domains.set_lb(var, lb);
        let lowered = self.domains.set_ub(var, ub);
        if raised == BoundChange::Conflict || lowered == BoundChange::Conflict {
            return false;
        }
        self.propagator.enqueue_var(var);
        true
    }

    fn record_leaf(&mut self) {
        let values = self.domains.lower_bounds().to_vec();
        if !self.model.is_satisfied(&values) {
            trace!(event = "leaf_rejected", node = self.scope.node_count());
            return;
        }
        let objective = self.model.evaluate_objective(&values);
        if self.best.as_ref().is_some_and(|(_, best)| objective >= *best) {
            return;
        }

        debug!(
            event = "new_best",
            objective,
            node = self.scope.node_count(),
            elapsed_ms = self.scope.elapsed().map(|d| d.as_millis() as u64),
        );
        self.scope.record_solution(objective);
        if self.pruning {
            self.propagator.tighten_objective(objective);
        }
        self.best = Some((values, objective));
    }

    fn into_result(self, exhausted: bool) -> BackendResult {
        let termination = if exhausted {
            TerminationReason::Exhausted
        } else {
            self.termination.reason(&self.scope)
        };
        let statistics = SearchStatistics {
            nodes: self.scope.node_count(),
            solutions: self.scope.solution_count(),
            elapsed: self.scope.elapsed().unwrap_or_default(),
            termination,
        };

        let status = match (&self.best, exhausted) {
            (Some(_), true) => BackendStatus::Optimal,
            (Some(_), false) => BackendStatus::Feasible,
            (None, true) => BackendStatus::Infeasible,
            (None, false) => BackendStatus::TimeoutNoProof,
        };
        let (values, objective) = match self.best {
            Some((values, objective)) => (Some(values), Some(objective)),
            None => (None, None),
        };
        BackendResult {
            status,
            values,
            objective,
            statistics,
        }
    }
}

#[cfg(test)]
mod tests;
