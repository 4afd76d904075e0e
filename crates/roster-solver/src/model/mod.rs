//! Linear model arena.
//!
//! Variables live in a flat arena addressed by [`VarId`]. Constraints and the
//! objective are linear expressions over those ids. The model is immutable
//! once handed to a [`Backend`](crate::Backend).

mod constraint;
mod expr;
mod variable;

use std::collections::BTreeMap;

use thiserror::Error;

pub use constraint::{LinearConstraint, Relation};
pub use expr::LinearExpr;
pub use variable::{VarId, VarKind, Variable};

/// Error raised while building a model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("variable '{name}' has an empty domain [{lb}, {ub}]")]
    EmptyDomain { name: String, lb: i64, ub: i64 },

    #[error("expression references unknown variable #{index}")]
    UnknownVariable { index: usize },

    #[error("scaling an expression by {scale} overflows")]
    CoefficientOverflow { scale: i64 },

    #[error("objective can reach magnitudes beyond {limit}")]
    ObjectiveOverflow { limit: i64 },
}

/// Largest objective magnitude a model may reach over its variable domains.
///
/// Propagation subtracts activities of this size from each other, so the
/// headroom above it keeps search arithmetic inside `i64`.
pub const MAX_OBJECTIVE_MAGNITUDE: i64 = i64::MAX / 4;

/// Variables, linear constraints and a linear objective to minimize.
///
/// # Example
///
/// ```
/// use roster_solver::{LinearExpr, LinearModel};
///
/// let mut model = LinearModel::new("pick-one");
/// let a = model.new_bool("a");
/// let b = model.new_bool("b");
/// model.add_le("at_most_one", LinearExpr::sum([a, b]), 1).unwrap();
/// model.minimize(LinearExpr::term(a, 3) + LinearExpr::term(b, 5)).unwrap();
///
/// assert_eq!(model.variable_count(), 2);
/// assert!(model.is_satisfied(&[1, 0]));
/// assert!(!model.is_satisfied(&[1, 1]));
/// assert_eq!(model.evaluate_objective(&[0, 1]), 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LinearModel {
    name: String,
    variables: Vec<Variable>,
    constraints: Vec<LinearConstraint>,
    objective: LinearExpr,
}

impl LinearModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a boolean variable.
    pub fn new_bool(&mut self, name: impl Into<String>) -> VarId {
        self.push_variable(Variable::boolean(name))
    }

    /// Adds an integer variable with domain `[lb, ub]`.
    pub fn new_int(&mut self, name: impl Into<String>, lb: i64, ub: i64) -> Result<VarId, ModelError> {
        let name = name.into();
        if lb > ub {
            return Err(ModelError::EmptyDomain { name, lb, ub });
        }
        Ok(self.push_variable(Variable::integer(name, lb, ub)))
    }

    fn push_variable(&mut self, variable: Variable) -> VarId {
        let id = VarId::new(self.variables.len());
        self.variables.push(variable);
        id
    }

    /// Adds `expr <relation> rhs` under the given family name.
    pub fn add_constraint(
        &mut self,
        family: impl Into<String>,
        expr: LinearExpr,
        relation: Relation,
        rhs: i64,
    ) -> Result<(), ModelError> {
        self.check_expr(&expr)?;
        self.constraints
            .push(LinearConstraint::new(family, expr, relation, rhs));
        Ok(())
    }

    pub fn add_le(&mut self, family: impl Into<String>, expr: LinearExpr, rhs: i64) -> Result<(), ModelError> {
        self.add_constraint(family, expr, Relation::Le, rhs)
    }

    pub fn add_eq(&mut self, family: impl Into<String>, expr: LinearExpr, rhs: i64) -> Result<(), ModelError> {
        self.add_constraint(family, expr, Relation::Eq, rhs)
    }

    pub fn add_ge(&mut self, family: impl Into<String>, expr: LinearExpr, rhs: i64) -> Result<(), ModelError> {
        self.add_constraint(family, expr, Relation::Ge, rhs)
    }

    /// Appends constraints generated elsewhere.
    pub fn extend_constraints(
        &mut self,
        constraints: impl IntoIterator<Item = LinearConstraint>,
    ) -> Result<(), ModelError> {
        for constraint in constraints {
            self.check_expr(constraint.expr())?;
            self.constraints.push(constraint);
        }
        Ok(())
    }

    /// Sets the expression to minimize.
    ///
    /// Fails if the objective could exceed [`MAX_OBJECTIVE_MAGNITUDE`] anywhere
    /// in the variable domains.
    pub fn minimize(&mut self, objective: LinearExpr) -> Result<(), ModelError> {
        self.check_expr(&objective)?;
        let objective = objective.simplified();
        self.magnitude_bound(&objective)
            .filter(|bound| *bound <= MAX_OBJECTIVE_MAGNITUDE)
            .ok_or(ModelError::ObjectiveOverflow {
                limit: MAX_OBJECTIVE_MAGNITUDE,
            })?;
        self.objective = objective;
        Ok(())
    }

    /// Upper bound on `|expr|` over the domains; `None` if it overflows.
    fn magnitude_bound(&self, expr: &LinearExpr) -> Option<i64> {
        expr.terms().iter().try_fold(
            expr.constant_value().checked_abs()?,
            |acc, &(var, coeff)| {
                let domain = &self.variables[var.index()];
                let reach = domain.lb.checked_abs()?.max(domain.ub.checked_abs()?);
                acc.checked_add(coeff.checked_abs()?.checked_mul(reach)?)
            },
        )
    }

    fn check_expr(&self, expr: &LinearExpr) -> Result<(), ModelError> {
        match expr
            .terms()
            .iter()
            .find(|(var, _)| var.index() >= self.variables.len())
        {
            Some((var, _)) => Err(ModelError::UnknownVariable { index: var.index() }),
            None => Ok(()),
        }
    }

    pub fn variable(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(id.index())
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Counts constraints per family name.
    pub fn constraint_count_by_family(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for constraint in &self.constraints {
            *counts.entry(constraint.family().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Evaluates the objective for a full assignment.
    pub fn evaluate_objective(&self, values: &[i64]) -> i64 {
        self.objective.evaluate(values)
    }

    /// Returns true if `values` respects every domain and constraint.
    pub fn is_satisfied(&self, values: &[i64]) -> bool {
        values.len() == self.variables.len()
            && self
                .variables
                .iter()
                .zip(values)
                .all(|(var, &value)| var.contains(value))
            && self.constraints.iter().all(|c| c.is_satisfied(values))
    }

    /// Indices of constraints violated by `values`.
    pub fn violated_constraints(&self, values: &[i64]) -> Vec<usize> {
        self.constraints
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_satisfied(values))
            .map(|(i, _)| i)
            .collect()
    }
}
