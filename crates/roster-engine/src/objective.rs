//! Objective composition.
//!
//! Three linear cost terms are weighted and summed:
//! - preference: `(10 - priority)` per assignment, priority 0 when undeclared
//! - shortage: `importance(role)` per missing person
//! - balance: `max_total - min_total`

use roster_config::ObjectiveWeights;
use roster_core::{Result, MAX_PRIORITY};
use roster_solver::{LinearExpr, LinearModel};
use serde::Serialize;

use crate::builder::{model_error, VariableArena};
use crate::normalize::SchedulingInput;

/// The unweighted cost terms and their weighted sum.
#[derive(Debug, Clone)]
pub struct ComposedObjective {
    pub preference: LinearExpr,
    pub shortage: LinearExpr,
    pub balance: LinearExpr,
    pub total: LinearExpr,
    pub weights: ObjectiveWeights,
}

impl ComposedObjective {
    /// Sets the weighted total as the model's objective.
    pub fn install(&self, model: &mut LinearModel) -> Result<()> {
        model.minimize(self.total.clone()).map_err(model_error)
    }
}

/// Builds the weighted objective over an arena.
///
/// Weights large enough to overflow a coefficient are a
/// [`ModelConstruction`](roster_core::RosterError::ModelConstruction) error.
pub fn compose_objective(
    input: &SchedulingInput,
    arena: &VariableArena,
    weights: &ObjectiveWeights,
) -> Result<ComposedObjective> {
    let preference: LinearExpr = arena
        .assignments()
        .map(|(key, var)| {
            let priority = input.priority(key.employee, key.slot).unwrap_or(0);
            (var, i64::from(MAX_PRIORITY - priority))
        })
        .collect();

    let shortage: LinearExpr = arena
        .shortages()
        .map(|((_, role), var)| (var, input.importance[role]))
        .collect();

    let balance = LinearExpr::from(arena.max_total()) - LinearExpr::from(arena.min_total());

    let mut total = LinearExpr::new();
    for (term, weight) in [
        (&balance, weights.balance),
        (&shortage, weights.shortage),
        (&preference, weights.preference),
    ] {
        total.try_add_scaled(term, weight).map_err(model_error)?;
    }

    Ok(ComposedObjective {
        preference,
        shortage,
        balance,
        total,
        weights: *weights,
    })
}

/// Raw and weighted value of one cost term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TermValue {
    pub raw: i64,
    pub weighted: i64,
}

/// Value of every cost term for a solved assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ObjectiveBreakdown {
    pub preference: TermValue,
    pub shortage: TermValue,
    pub balance: TermValue,
    pub total: i64,
}

impl ObjectiveBreakdown {
    pub fn evaluate(objective: &ComposedObjective, values: &[i64]) -> Self {
        let term = |expr: &LinearExpr, weight: i64| {
            let raw = expr.evaluate(values);
            TermValue {
                raw,
                weighted: raw.saturating_mul(weight),
            }
        };
        Self {
            preference: term(&objective.preference, objective.weights.preference),
            shortage: term(&objective.shortage, objective.weights.shortage),
            balance: term(&objective.balance, objective.weights.balance),
            total: objective.total.evaluate(values),
        }
    }
}
