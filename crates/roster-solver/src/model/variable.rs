//! Decision variables.

use std::fmt;

/// Index of a variable in its model's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(usize);

impl VarId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Bool,
    Int,
}

/// A named variable with an inclusive integer domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub kind: VarKind,
    pub lb: i64,
    pub ub: i64,
}

impl Variable {
    pub fn boolean(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Bool,
            lb: 0,
            ub: 1,
        }
    }

    pub fn integer(name: impl Into<String>, lb: i64, ub: i64) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Int,
            lb,
            ub,
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        self.lb <= value && value <= self.ub
    }

    pub fn is_bool(&self) -> bool {
        self.kind == VarKind::Bool
    }
}
