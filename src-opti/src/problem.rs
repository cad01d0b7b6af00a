//! Backend-independent problem storage.

use crate::expr::{Expr, Rel, RelKind};

/// Variables, constraints, objective and seeds accumulated through the
/// [`Opti`](crate::Opti) surface, ready to hand to a solver.
///
/// Relations of the shape `var <= c` / `c <= var` (and exact pins
/// `var == c`) are folded into per-variable bounds instead of general
/// constraints; interior solvers handle bounds natively and the fold keeps
/// the constraint Jacobian small.
pub(crate) struct OptiProblem {
    pub(crate) n_vars: usize,
    pub(crate) objective: Option<Expr>,
    pub(crate) equalities: Vec<Expr>,
    pub(crate) inequalities: Vec<Expr>,
    pub(crate) lower: Vec<f64>,
    pub(crate) upper: Vec<f64>,
    pub(crate) initial: Vec<f64>,
    pub(crate) solution: Option<Vec<f64>>,
}

impl OptiProblem {
    pub(crate) fn new() -> OptiProblem {
        OptiProblem {
            n_vars: 0,
            objective: None,
            equalities: Vec::new(),
            inequalities: Vec::new(),
            lower: Vec::new(),
            upper: Vec::new(),
            initial: Vec::new(),
            solution: None,
        }
    }

    pub(crate) fn decision_variable(&mut self) -> Expr {
        let index = self.n_vars;
        self.n_vars += 1;
        self.lower.push(f64::NEG_INFINITY);
        self.upper.push(f64::INFINITY);
        self.initial.push(0.0);
        Expr::var(index)
    }

    pub(crate) fn minimize(&mut self, objective: Expr) {
        self.objective = Some(objective);
    }

    pub(crate) fn subject_to(&mut self, rel: Rel) {
        match rel.kind {
            RelKind::Le => {
                if let Some((index, c)) = rel.expr.as_var_minus_const() {
                    self.upper[index] = self.upper[index].min(c);
                } else if let Some((index, c)) = rel.expr.as_const_minus_var() {
                    self.lower[index] = self.lower[index].max(c);
                } else {
                    self.inequalities.push(rel.expr);
                }
            }
            RelKind::Eq => {
                let pin = rel
                    .expr
                    .as_var_minus_const()
                    .or_else(|| rel.expr.as_const_minus_var());
                if let Some((index, c)) = pin {
                    self.lower[index] = self.lower[index].max(c);
                    self.upper[index] = self.upper[index].min(c);
                } else {
                    self.equalities.push(rel.expr);
                }
            }
        }
    }

    pub(crate) fn set_initial(&mut self, expr: &Expr, value: f64) {
        if let Some(index) = expr.var_index() {
            self.initial[index] = value;
        }
    }

    /// The seed point, clamped into the folded bounds.
    pub(crate) fn clamped_initial(&self) -> Vec<f64> {
        self.initial
            .iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .map(|(&x, (&lo, &hi))| x.clamp(lo.min(hi), hi.max(lo)))
            .collect()
    }

    pub(crate) fn solution_value(&self, expr: &Expr) -> f64 {
        match &self.solution {
            Some(x) => expr.value(x),
            None => 0.0,
        }
    }
}
