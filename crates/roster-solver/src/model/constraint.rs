//! Linear constraints.

use std::fmt;

use super::LinearExpr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Le,
    Eq,
    Ge,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Le => write!(f, "<="),
            Relation::Eq => write!(f, "=="),
            Relation::Ge => write!(f, ">="),
        }
    }
}

/// `expr <relation> rhs`, tagged with the family that generated it.
///
/// The expression constant is folded into `rhs` and duplicate terms are merged
/// on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearConstraint {
    family: String,
    expr: LinearExpr,
    relation: Relation,
    rhs: i64,
}

impl LinearConstraint {
    pub fn new(family: impl Into<String>, expr: LinearExpr, relation: Relation, rhs: i64) -> Self {
        let folded = rhs - expr.constant_value();
        let mut expr = expr.simplified();
        expr.add_constant(-expr.constant_value());
        Self {
            family: family.into(),
            expr,
            relation,
            rhs: folded,
        }
    }

    pub fn le(family: impl Into<String>, expr: LinearExpr, rhs: i64) -> Self {
        Self::new(family, expr, Relation::Le, rhs)
    }

    pub fn eq(family: impl Into<String>, expr: LinearExpr, rhs: i64) -> Self {
        Self::new(family, expr, Relation::Eq, rhs)
    }

    pub fn ge(family: impl Into<String>, expr: LinearExpr, rhs: i64) -> Self {
        Self::new(family, expr, Relation::Ge, rhs)
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn expr(&self) -> &LinearExpr {
        &self.expr
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn rhs(&self) -> i64 {
        self.rhs
    }

    pub fn is_satisfied(&self, values: &[i64]) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.relation {
            Relation::Le => lhs <= self.rhs,
            Relation::Eq => lhs == self.rhs,
            Relation::Ge => lhs >= self.rhs,
        }
    }
}

impl fmt::Display for LinearConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.family)?;
        for (i, (var, coeff)) in self.expr.terms().iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{coeff}*{var}")?;
        }
        write!(f, " {} {}", self.relation, self.rhs)
    }
}
