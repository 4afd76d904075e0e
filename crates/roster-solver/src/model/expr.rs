//! Linear expressions.

use std::collections::BTreeMap;
use std::ops::{Add, Mul, Neg, Sub};

use super::{ModelError, VarId};

/// `Σ coeff·var + constant`.
///
/// # Example
///
/// ```
/// use roster_solver::{LinearExpr, LinearModel};
///
/// let mut model = LinearModel::new("demo");
/// let x = model.new_bool("x");
/// let y = model.new_int("y", 0, 5).unwrap();
///
/// let expr = LinearExpr::term(x, 2) + LinearExpr::from(y) * 3 - LinearExpr::constant(1);
/// assert_eq!(expr.evaluate(&[1, 4]), 13);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinearExpr {
    terms: Vec<(VarId, i64)>,
    constant: i64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(value: i64) -> Self {
        Self {
            terms: Vec::new(),
            constant: value,
        }
    }

    pub fn term(var: VarId, coeff: i64) -> Self {
        let mut expr = Self::new();
        expr.add_term(var, coeff);
        expr
    }

    /// Sum of variables with unit coefficients.
    pub fn sum(vars: impl IntoIterator<Item = VarId>) -> Self {
        let mut expr = Self::new();
        for var in vars {
            expr.add_term(var, 1);
        }
        expr
    }

    /// Adds `coeff·var`; zero coefficients are dropped.
    pub fn add_term(&mut self, var: VarId, coeff: i64) {
        if coeff != 0 {
            self.terms.push((var, coeff));
        }
    }

    pub fn with_term(mut self, var: VarId, coeff: i64) -> Self {
        self.add_term(var, coeff);
        self
    }

    pub fn add_constant(&mut self, value: i64) {
        self.constant += value;
    }

    /// Adds `scale·other` to this expression.
    pub fn add_scaled(&mut self, other: &LinearExpr, scale: i64) {
        if scale == 0 {
            return;
        }
        for &(var, coeff) in &other.terms {
            self.add_term(var, coeff * scale);
        }
        self.constant += other.constant * scale;
    }

    /// As [`add_scaled`](Self::add_scaled), failing instead of overflowing.
    /// Leaves `self` untouched on error.
    pub fn try_add_scaled(&mut self, other: &LinearExpr, scale: i64) -> Result<(), ModelError> {
        if scale == 0 {
            return Ok(());
        }
        let overflow = || ModelError::CoefficientOverflow { scale };
        let scaled = other
            .terms
            .iter()
            .map(|&(var, coeff)| coeff.checked_mul(scale).map(|c| (var, c)))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(overflow)?;
        let constant = other
            .constant
            .checked_mul(scale)
            .and_then(|c| c.checked_add(self.constant))
            .ok_or_else(overflow)?;
        for (var, coeff) in scaled {
            self.add_term(var, coeff);
        }
        self.constant = constant;
        Ok(())
    }

    pub fn terms(&self) -> &[(VarId, i64)] {
        &self.terms
    }

    pub fn constant_value(&self) -> i64 {
        self.constant
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Coefficient of `var` after merging duplicate terms.
    pub fn coefficient(&self, var: VarId) -> i64 {
        self.terms
            .iter()
            .filter(|(v, _)| *v == var)
            .map(|(_, c)| c)
            .sum()
    }

    /// Merges duplicate variables and drops cancelled terms.
    pub fn simplified(&self) -> Self {
        let mut merged: BTreeMap<VarId, i64> = BTreeMap::new();
        for &(var, coeff) in &self.terms {
            *merged.entry(var).or_insert(0) += coeff;
        }
        Self {
            terms: merged.into_iter().filter(|(_, c)| *c != 0).collect(),
            constant: self.constant,
        }
    }

    /// Evaluates against a full assignment indexed by variable.
    pub fn evaluate(&self, values: &[i64]) -> i64 {
        self.terms
            .iter()
            .map(|(var, coeff)| coeff * values.get(var.index()).copied().unwrap_or(0))
            .sum::<i64>()
            + self.constant
    }
}

impl From<VarId> for LinearExpr {
    fn from(var: VarId) -> Self {
        LinearExpr::term(var, 1)
    }
}

impl FromIterator<(VarId, i64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (VarId, i64)>>(iter: I) -> Self {
        let mut expr = LinearExpr::new();
        for (var, coeff) in iter {
            expr.add_term(var, coeff);
        }
        expr
    }
}

impl Add for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: LinearExpr) -> LinearExpr {
        self.add_scaled(&rhs, 1);
        self
    }
}

impl Sub for LinearExpr {
    type Output = LinearExpr;

    fn sub(mut self, rhs: LinearExpr) -> LinearExpr {
        self.add_scaled(&rhs, -1);
        self
    }
}

impl Mul<i64> for LinearExpr {
    type Output = LinearExpr;

    fn mul(self, rhs: i64) -> LinearExpr {
        let mut scaled = LinearExpr::new();
        scaled.add_scaled(&self, rhs);
        scaled
    }
}

impl Neg for LinearExpr {
    type Output = LinearExpr;

    fn neg(self) -> LinearExpr {
        self * -1
    }
}
