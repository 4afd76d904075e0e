//! Bound propagation over linear rows.
//!
//! Every constraint is normalized into rows of the form `Σ a·x <= rhs`
//! (`>=` rows are negated, `==` rows become two rows). A row is propagated
//! from its minimum activity: each term may use at most the slack the other
//! terms leave.

use std::collections::VecDeque;

use super::domains::{BoundChange, Domains};
use crate::model::{LinearModel, Relation};

#[derive(Debug, Clone)]
struct Row {
    terms: Vec<(usize, i64)>,
    rhs: i64,
    active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Conflict;

#[derive(Debug, Clone)]
pub(crate) struct Propagator {
    rows: Vec<Row>,
    watches: Vec<Vec<usize>>,
    queue: VecDeque<usize>,
    queued: Vec<bool>,
    objective_row: usize,
    objective_constant: i64,
}

pub(crate) fn floor_div(n: i64, d: i64) -> i64 {
    n.div_euclid(d)
}

pub(crate) fn ceil_div(n: i64, d: i64) -> i64 {
    -((-n).div_euclid(d))
}

impl Propagator {
    pub(crate) fn new(model: &LinearModel) -> Self {
        let mut rows = Vec::with_capacity(model.constraint_count() + 1);
        for constraint in model.constraints() {
            let terms: Vec<(usize, i64)> = constraint
                .expr()
                .terms()
                .iter()
                .map(|(v, c)| (v.index(), *c))
                .collect();
            let negated = || terms.iter().map(|&(v, c)| (v, -c)).collect::<Vec<_>>();
            match constraint.relation() {
                Relation::Le => rows.push(Row::new(terms.clone(), constraint.rhs())),
                Relation::Ge => rows.push(Row::new(negated(), -constraint.rhs())),
                Relation::Eq => {
                    rows.push(Row::new(terms.clone(), constraint.rhs()));
                    rows.push(Row::new(negated(), -constraint.rhs()));
                }
            }
        }

        let objective = model.objective();
        let objective_row = rows.len();
        rows.push(Row {
            terms: objective
                .terms()
                .iter()
                .map(|(v, c)| (v.index(), *c))
                .collect(),
            rhs: 0,
            active: false,
        });

        let mut watches = vec![Vec::new(); model.variable_count()];
        for (index, row) in rows.iter().enumerate() {
            for &(var, _) in &row.terms {
                watches[var].push(index);
            }
        }

        let queued = vec![false; rows.len()];
        Self {
            rows,
            watches,
            queue: VecDeque::new(),
            queued,
            objective_row,
            objective_constant: objective.constant_value(),
        }
    }

    pub(crate) fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Requires every later solution to have objective strictly below `best`.
    pub(crate) fn tighten_objective(&mut self, best: i64) {
        let row = &mut self.rows[self.objective_row];
        row.active = true;
        row.rhs = best - 1 - self.objective_constant;
    }

    pub(crate) fn enqueue_all(&mut self) {
        for index in 0..self.rows.len() {
            self.enqueue(index);
        }
    }

    /// Schedules every row that mentions `var`, plus the objective cut.
    pub(crate) fn enqueue_var(&mut self, var: usize) {
        for i in 0..self.watches[var].len() {
            let row = self.watches[var][i];
            self.enqueue(row);
        }
        self.enqueue(self.objective_row);
    }

    fn enqueue(&mut self, row: usize) {
        if !self.queued[row] {
            self.queued[row] = true;
            self.queue.push_back(row);
        }
    }

    fn clear_queue(&mut self) {
        while let Some(row) = self.queue.pop_front() {
            self.queued[row] = false;
        }
    }

    /// Runs queued rows to a fixpoint.
    pub(crate) fn propagate(&mut self, domains: &mut Domains) -> Result<(), Conflict> {
        let mut changed = Vec::new();
        while let Some(index) = self.queue.pop_front() {
            self.queued[index] = false;
            changed.clear();
            if let Err(conflict) = self.rows[index].propagate(domains, &mut changed) {
                self.clear_queue();
                return Err(conflict);
            }
            for &var in &changed {
                for i in 0..self.watches[var].len() {
                    let row = self.watches[var][i];
                    if row != index {
                        self.enqueue(row);
                    }
                }
            }
        }
        Ok(())
    }
}

impl Row {
    fn new(terms: Vec<(usize, i64)>, rhs: i64) -> Self {
        Self {
            terms,
            rhs,
            active: true,
        }
    }

    fn min_contribution(coeff: i64, var: usize, domains: &Domains) -> i64 {
        if coeff > 0 {
            coeff * domains.lb(var)
        } else {
            coeff * domains.ub(var)
        }
    }

    fn propagate(&self, domains: &mut Domains, changed: &mut Vec<usize>) -> Result<(), Conflict> {
        if !self.active {
            return Ok(());
        }
        let min_activity: i64 = self
            .terms
            .iter()
            .map(|&(var, coeff)| Self::min_contribution(coeff, var, domains))
            .sum();
        if min_activity > self.rhs {
            return Err(Conflict);
        }

        // Tightening never moves a term's minimum contribution, so one pass
        // reaches this row's fixpoint.
        for &(var, coeff) in &self.terms {
            let slack = self.rhs - (min_activity - Self::min_contribution(coeff, var, domains));
            let change = if coeff > 0 {
                domains.set_ub(var, floor_div(slack, coeff))
            } else {
                domains.set_lb(var, ceil_div(-slack, -coeff))
            };
            match change {
                BoundChange::Unchanged => {}
                BoundChange::Tightened => changed.push(var),
                BoundChange::Conflict => return Err(Conflict),
            }
        }
        Ok(())
    }
}
