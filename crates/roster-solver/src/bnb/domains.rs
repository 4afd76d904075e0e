//! Variable bounds with an undo trail.

/// Result of tightening a bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BoundChange {
    Unchanged,
    Tightened,
    Conflict,
}

#[derive(Debug, Clone)]
pub(crate) struct Domains {
    lb: Vec<i64>,
    ub: Vec<i64>,
    trail: Vec<(usize, i64, i64)>,
}

impl Domains {
    pub(crate) fn new(bounds: impl IntoIterator<Item = (i64, i64)>) -> Self {
        let (lb, ub) = bounds.into_iter().unzip();
        Self {
            lb,
            ub,
            trail: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.lb.len()
    }

    pub(crate) fn lb(&self, var: usize) -> i64 {
        self.lb[var]
    }

    pub(crate) fn ub(&self, var: usize) -> i64 {
        self.ub[var]
    }

    pub(crate) fn is_fixed(&self, var: usize) -> bool {
        self.lb[var] == self.ub[var]
    }

    /// Lower bounds, which equal the values once every variable is fixed.
    pub(crate) fn lower_bounds(&self) -> &[i64] {
        &self.lb
    }

    pub(crate) fn set_lb(&mut self, var: usize, value: i64) -> BoundChange {
        if value <= self.lb[var] {
            return BoundChange::Unchanged;
        }
        if value > self.ub[var] {
            return BoundChange::Conflict;
        }
        self.trail.push((var, self.lb[var], self.ub[var]));
        self.lb[var] = value;
        BoundChange::Tightened
    }

    pub(crate) fn set_ub(&mut self, var: usize, value: i64) -> BoundChange {
        if value >= self.ub[var] {
            return BoundChange::Unchanged;
        }
        if value < self.lb[var] {
            return BoundChange::Conflict;
        }
        self.trail.push((var, self.lb[var], self.ub[var]));
        self.ub[var] = value;
        BoundChange::Tightened
    }

    pub(crate) fn mark(&self) -> usize {
        self.trail.len()
    }

    /// Restores every bound changed since `mark`.
    pub(crate) fn undo_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            if let Some((var, lb, ub)) = self.trail.pop() {
                self.lb[var] = lb;
                self.ub[var] = ub;
            }
        }
    }
}
