use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use super::propagate::{ceil_div, floor_div};
use super::*;
use crate::model::LinearExpr;

fn solve(model: &LinearModel) -> BackendResult {
    BranchAndBound::new().solve(model, &SolveLimits::new())
}

/// Choose exactly `k` of `n` items with the given costs.
fn choose_k(costs: &[i64], k: i64) -> LinearModel {
    let mut model = LinearModel::new("choose-k");
    let vars: Vec<_> = (0..costs.len())
        .map(|i| model.new_bool(format!("x{i}")))
        .collect();
    model.add_eq("count", LinearExpr::sum(vars.iter().copied()), k).unwrap();
    model
        .minimize(vars.iter().zip(costs).map(|(v, c)| (*v, *c)).collect())
        .unwrap();
    model
}

#[test]
fn test_rounding_helpers() {
    assert_eq!(floor_div(7, 2), 3);
    assert_eq!(floor_div(-7, 2), -4);
    assert_eq!(ceil_div(7, 2), 4);
    assert_eq!(ceil_div(-7, 2), -3);
    assert_eq!(ceil_div(6, 3), 2);
}

#[test]
fn test_empty_model_is_optimal() {
    let mut model = LinearModel::new("empty");
    model.minimize(LinearExpr::constant(7)).unwrap();

    let result = solve(&model);

    assert_eq!(result.status, BackendStatus::Optimal);
    assert_eq!(result.objective, Some(7));
    assert_eq!(result.values, Some(vec![]));
}

#[test]
fn test_choose_cheapest_items() {
    let model = choose_k(&[5, 1, 4, 2, 3], 2);

    let result = solve(&model);

    assert_eq!(result.status, BackendStatus::Optimal);
    assert_eq!(result.objective, Some(3));
    assert_eq!(result.values, Some(vec![0, 1, 0, 1, 0]));
    assert_eq!(result.statistics.termination, TerminationReason::Exhausted);
    assert!(result.statistics.solutions >= 1);
}

#[test]
fn test_pruning_disabled_finds_same_optimum() {
    let model = choose_k(&[5, 1, 4, 2, 3], 3);
    let backend = BranchAndBound::with_config(BranchAndBoundConfig {
        enable_pruning: false,
    });

    let pruned = solve(&model);
    let full = backend.solve(&model, &SolveLimits::new());

    assert_eq!(full.status, BackendStatus::Optimal);
    assert_eq!(full.objective, pruned.objective);
    assert!(full.statistics.nodes >= pruned.statistics.nodes);
}

#[test]
fn test_infeasible_model_is_proven() {
    let mut model = LinearModel::new("infeasible");
    let a = model.new_bool("a");
    let b = model.new_bool("b");
    model.add_ge("need", LinearExpr::sum([a, b]), 2).unwrap();
    model.add_le("cap", LinearExpr::sum([a, b]), 1).unwrap();

    let result = solve(&model);

    assert_eq!(result.status, BackendStatus::Infeasible);
    assert!(result.values.is_none());
}

#[test]
fn test_integer_variables_and_negative_coefficients() {
    // maximize 3y - x  subject to  y <= x + 2, x in [0, 4], y in [0, 10]
    let mut model = LinearModel::new("ints");
    let x = model.new_int("x", 0, 4).unwrap();
    let y = model.new_int("y", 0, 10).unwrap();
    model
        .add_le("link", LinearExpr::from(y) - LinearExpr::from(x), 2)
        .unwrap();
    model
        .minimize(LinearExpr::term(x, 1) + LinearExpr::term(y, -3))
        .unwrap();

    let result = solve(&model);

    assert_eq!(result.status, BackendStatus::Optimal);
    assert_eq!(result.value(x), Some(4));
    assert_eq!(result.value(y), Some(6));
    assert_eq!(result.objective, Some(-14));
}

#[test]
fn test_min_max_linearisation() {
    // Spread 4 units across two bins; minimize max - min.
    let mut model = LinearModel::new("balance");
    let a = model.new_int("a", 0, 4).unwrap();
    let b = model.new_int("b", 0, 4).unwrap();
    let hi = model.new_int("hi", 0, 4).unwrap();
    let lo = model.new_int("lo", 0, 4).unwrap();
    model.add_eq("total", LinearExpr::sum([a, b]), 4).unwrap();
    for v in [a, b] {
        model.add_le("max", LinearExpr::from(v) - LinearExpr::from(hi), 0).unwrap();
        model.add_le("min", LinearExpr::from(lo) - LinearExpr::from(v), 0).unwrap();
    }
    model
        .minimize(LinearExpr::from(hi) - LinearExpr::from(lo))
        .unwrap();

    let result = solve(&model);

    assert_eq!(result.status, BackendStatus::Optimal);
    assert_eq!(result.objective, Some(0));
    assert_eq!(result.value(a), Some(2));
    assert_eq!(result.value(b), Some(2));
}

#[test]
fn test_solutions_satisfy_model() {
    let model = choose_k(&[3, 3, 1, 7, 2, 2], 4);

    let result = solve(&model);
    let values = result.values.expect("solution");

    assert!(model.is_satisfied(&values));
    assert_eq!(model.evaluate_objective(&values), result.objective.unwrap());
}

#[test]
fn test_node_limit_returns_incumbent_or_no_proof() {
    let model = choose_k(&[9, 8, 7, 6, 5, 4, 3, 2, 1, 0], 5);
    let limits = SolveLimits::new().with_node_limit(12);

    let result = solve_with(&model, &limits);

    assert_eq!(result.statistics.termination, TerminationReason::NodeLimit);
    assert!(result.statistics.nodes <= 12);
    match result.status {
        BackendStatus::Feasible => {
            assert!(model.is_satisfied(result.values.as_ref().unwrap()));
        }
        BackendStatus::TimeoutNoProof => assert!(result.values.is_none()),
        other => panic!("unexpected status {other:?}"),
    }
}

#[test]
fn test_zero_time_limit_without_solution() {
    let model = choose_k(&[1, 2, 3], 1);
    let limits = SolveLimits::new().with_time_limit(Duration::ZERO);

    let result = solve_with(&model, &limits);

    assert_eq!(result.status, BackendStatus::TimeoutNoProof);
    assert_eq!(result.statistics.termination, TerminationReason::TimeLimit);
}

#[test]
fn test_raised_flag_cancels() {
    let model = choose_k(&[1, 2, 3], 1);
    let flag = Arc::new(AtomicBool::new(true));
    let limits = SolveLimits::new()
        .with_terminate_flag(flag)
        .with_time_limit(Duration::ZERO);

    let result = solve_with(&model, &limits);

    assert_eq!(result.status, BackendStatus::TimeoutNoProof);
    assert_eq!(result.statistics.termination, TerminationReason::Cancelled);
}

fn solve_with(model: &LinearModel, limits: &SolveLimits) -> BackendResult {
    BranchAndBound::new().solve(model, limits)
}

#[test]
fn test_domains_undo() {
    let mut domains = Domains::new([(0, 1), (0, 5)]);
    let mark = domains.mark();

    assert_eq!(domains.set_lb(1, 2), BoundChange::Tightened);
    assert_eq!(domains.set_ub(1, 1), BoundChange::Conflict);
    assert_eq!(domains.set_ub(0, 0), BoundChange::Tightened);
    assert!(domains.is_fixed(0));

    domains.undo_to(mark);
    assert_eq!((domains.lb(0), domains.ub(0)), (0, 1));
    assert_eq!((domains.lb(1), domains.ub(1)), (0, 5));
}
