// NLOpt-backed Opti implementations.

use nlopt::{Algorithm, FailState, Nlopt, Target};

use crate::cancellation;
use crate::expr::{Expr, Rel};
use crate::problem::OptiProblem;
use crate::{Opti, SolveError};

const MAX_EVALUATIONS: u32 = 3000;
const CONSTRAINT_TOL: f64 = 1e-8;

/// Evaluate a residual or objective for an NLOpt callback, polling the
/// cancellation flag first. NaN drives the solver out of its line search;
/// the solve boundary maps the aborted run to [`SolveError::Cancelled`].
fn evaluate(expr: &Expr, x: &[f64], grad: Option<&mut [f64]>) -> f64 {
    if cancellation::is_set() {
        if let Some(grad) = grad {
            grad.fill(0.0);
        }
        return f64::NAN;
    }
    match grad {
        Some(grad) => expr.value_and_grad(x, grad),
        None => expr.value(x),
    }
}

fn solve_nlopt(problem: &mut OptiProblem, algo: Algorithm) -> Result<(), SolveError> {
    cancellation::clear();
    problem.solution = None;

    let n = problem.n_vars;
    if n == 0 {
        return Err(SolveError::Solver("problem has no decision variables".into()));
    }
    let objective = problem
        .objective
        .clone()
        .unwrap_or_else(|| Expr::constant(0.0));

    let mut optimizer = Nlopt::new(
        algo,
        n,
        move |x: &[f64], grad: Option<&mut [f64]>, _: &mut ()| evaluate(&objective, x, grad),
        Target::Minimize,
        (),
    );

    let _ = optimizer.set_lower_bounds(&problem.lower);
    let _ = optimizer.set_upper_bounds(&problem.upper);

    for expr in &problem.equalities {
        let residual = expr.clone();
        let _ = optimizer.add_equality_constraint(
            move |x: &[f64], grad: Option<&mut [f64]>, _: &mut ()| evaluate(&residual, x, grad),
            (),
            CONSTRAINT_TOL,
        );
    }
    for expr in &problem.inequalities {
        let residual = expr.clone();
        let _ = optimizer.add_inequality_constraint(
            move |x: &[f64], grad: Option<&mut [f64]>, _: &mut ()| evaluate(&residual, x, grad),
            (),
            CONSTRAINT_TOL,
        );
    }

    let _ = optimizer.set_maxeval(MAX_EVALUATIONS);
    let _ = optimizer.set_ftol_rel(1e-8);
    let _ = optimizer.set_xtol_rel(1e-8);

    eprintln!(
        "{:?}: {} variables, {} equality / {} inequality constraints",
        algo,
        n,
        problem.equalities.len(),
        problem.inequalities.len()
    );

    let mut x = problem.clamped_initial();
    let outcome = optimizer.optimize(&mut x);

    // A cancellation request wins over whatever status the solver reports.
    if cancellation::is_set() {
        return Err(SolveError::Cancelled);
    }

    match outcome {
        Ok(_) => {
            problem.solution = Some(x);
            Ok(())
        }
        // SLSQP routinely stops roundoff-limited right at the optimum; the
        // final iterate is still valid.
        Err((FailState::RoundoffLimited, _)) => {
            problem.solution = Some(x);
            Ok(())
        }
        Err((state, _)) => Err(SolveError::Solver(format!("{state:?}"))),
    }
}

/// Gradient-based SQP backend (NLOpt SLSQP) fed exact reverse-mode Jacobians.
/// This is the default backend for trajectory problems.
pub struct SlsqpOpti {
    problem: OptiProblem,
}

impl SlsqpOpti {
    pub fn new() -> SlsqpOpti {
        SlsqpOpti {
            problem: OptiProblem::new(),
        }
    }
}

impl Default for SlsqpOpti {
    fn default() -> Self {
        Self::new()
    }
}

impl Opti for SlsqpOpti {
    fn decision_variable(&mut self) -> Expr {
        self.problem.decision_variable()
    }

    fn minimize(&mut self, objective: Expr) {
        self.problem.minimize(objective);
    }

    fn subject_to(&mut self, rel: Rel) {
        self.problem.subject_to(rel);
    }

    fn set_initial(&mut self, expr: &Expr, value: f64) {
        self.problem.set_initial(expr, value);
    }

    fn solve(&mut self) -> Result<(), SolveError> {
        solve_nlopt(&mut self.problem, Algorithm::Slsqp)
    }

    fn solution_value(&self, expr: &Expr) -> f64 {
        self.problem.solution_value(expr)
    }
}

/// Derivative-free backend (NLOpt COBYLA). Lighter per-iteration cost and no
/// gradient evaluations; practical for small problems only.
pub struct CobylaOpti {
    problem: OptiProblem,
}

impl CobylaOpti {
    pub fn new() -> CobylaOpti {
        CobylaOpti {
            problem: OptiProblem::new(),
        }
    }
}

impl Default for CobylaOpti {
    fn default() -> Self {
        Self::new()
    }
}

impl Opti for CobylaOpti {
    fn decision_variable(&mut self) -> Expr {
        self.problem.decision_variable()
    }

    fn minimize(&mut self, objective: Expr) {
        self.problem.minimize(objective);
    }

    fn subject_to(&mut self, rel: Rel) {
        self.problem.subject_to(rel);
    }

    fn set_initial(&mut self, expr: &Expr, value: f64) {
        self.problem.set_initial(expr, value);
    }

    fn solve(&mut self) -> Result<(), SolveError> {
        solve_nlopt(&mut self.problem, Algorithm::Cobyla)
    }

    fn solution_value(&self, expr: &Expr) -> f64 {
        self.problem.solution_value(expr)
    }
}
