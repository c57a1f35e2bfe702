//! least_squares::solver: Levenberg–Marquardt as an `argmin` solver.
//!
//! Purpose
//! -------
//! Minimize `c(θ) = ½‖r(θ)‖²` for a residual operator with a Jacobian,
//! without pulling in a LAPACK-backed `ndarray-linalg`. Linear systems are
//! solved in `nalgebra`.
//!
//! Key behaviors
//! -------------
//! - Each iteration solves `(JᵀJ + λ·D) δ = −Jᵀr` where `D` is the floored
//!   diagonal of `JᵀJ` (Marquardt scaling). Cholesky first, LU as fallback.
//! - Steps are accepted when the gain ratio `ρ = Δc_actual / Δc_predicted`
//!   is positive; `λ` then shrinks by `max(1/3, 1 − (2ρ − 1)³)`. Rejected or
//!   non-finite trial points grow `λ` geometrically instead of failing.
//! - Termination: gradient inf-norm below `gtol`, relative step below
//!   `xtol`, relative cost reduction below `ftol`, zero cost, the
//!   evaluation cap, or a damping overflow. Only the first four count as
//!   convergence.
//!
//! Invariants & assumptions
//! ------------------------
//! - Residuals and the Jacobian are cached for the current accepted point;
//!   the Jacobian is re-evaluated only after an accepted step.
//! - `state.param` always holds the current accepted point and
//!   `state.cost` its cost, so argmin's best-point tracking is exact.
//!
//! Testing notes
//! -------------
//! - Unit tests cover a linear problem solved in one step, the Rosenbrock
//!   residual problem, and the evaluation-cap exit path.
use crate::optimization::least_squares::{
    traits::Tolerances,
    types::{Cost, DIAG_FLOOR, JacobianMatrix, MAX_DAMPING, Residuals, Theta},
};
use argmin::core::{
    Error, IterState, Jacobian, KV, Operator, Problem, Solver, State,
    TerminationReason, TerminationStatus,
};
use argmin_math::ArgminL2Norm;
use nalgebra::{DMatrix, DVector};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Levenberg–Marquardt solver state.
///
/// Construct with [`LevenbergMarquardt::new`]; the executor drives it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevenbergMarquardt {
    tols: Tolerances,
    damping: f64,
    nu: f64,
    nfev: usize,
    residuals: Option<Residuals>,
    jacobian: Option<JacobianMatrix>,
    status: TerminationStatus,
}

impl LevenbergMarquardt {
    /// Create a solver with the given stopping rules and initial damping.
    pub fn new(tols: Tolerances, initial_damping: f64) -> Self {
        Self {
            tols,
            damping: initial_damping,
            nu: 2.0,
            nfev: 0,
            residuals: None,
            jacobian: None,
            status: TerminationStatus::NotTerminated,
        }
    }

    fn converge(&mut self, criterion: &str) {
        debug!(criterion, damping = self.damping, nfev = self.nfev, "levenberg-marquardt converged");
        self.status = TerminationStatus::Terminated(TerminationReason::SolverConverged);
    }

    fn exit(&mut self, reason: &str) {
        debug!(reason, damping = self.damping, nfev = self.nfev, "levenberg-marquardt stopped");
        self.status = TerminationStatus::Terminated(TerminationReason::SolverExit(reason.to_string()));
    }

    fn reject(&mut self) {
        self.damping *= self.nu;
        self.nu *= 2.0;
    }

    fn budget_exhausted(&self) -> bool {
        self.nfev >= self.tols.max_nfev
    }
}

impl<O> Solver<O, IterState<Theta, (), (), (), (), f64>> for LevenbergMarquardt
where
    O: Operator<Param = Theta, Output = Residuals>
        + Jacobian<Param = Theta, Jacobian = JacobianMatrix>,
{
    const NAME: &'static str = "Levenberg-Marquardt";

    fn init(
        &mut self, problem: &mut Problem<O>, state: IterState<Theta, (), (), (), (), f64>,
    ) -> Result<(IterState<Theta, (), (), (), (), f64>, Option<KV>), Error> {
        let theta = state.get_param().cloned().ok_or_else(|| {
            argmin::core::ArgminError::NotInitialized {
                text: "Levenberg-Marquardt requires an initial parameter vector".to_string(),
            }
        })?;
        let r = problem.apply(&theta)?;
        self.nfev += 1;
        let c = half_sq_norm(&r);
        if !c.is_finite() {
            return Err(argmin::core::ArgminError::InvalidParameter {
                text: "residuals at the initial parameter vector are not finite".to_string(),
            }
            .into());
        }
        let jac = problem.jacobian(&theta)?;
        self.residuals = Some(r);
        self.jacobian = Some(jac);
        if c == 0.0 {
            self.converge("zero cost");
        }
        Ok((state.cost(c), None))
    }

    fn next_iter(
        &mut self, problem: &mut Problem<O>, state: IterState<Theta, (), (), (), (), f64>,
    ) -> Result<(IterState<Theta, (), (), (), (), f64>, Option<KV>), Error> {
        let (theta, r, jac) = match (state.get_param(), &self.residuals, &self.jacobian) {
            (Some(theta), Some(r), Some(jac)) => (theta.clone(), r.clone(), jac.clone()),
            _ => {
                return Err(argmin::core::ArgminError::NotInitialized {
                    text: "Levenberg-Marquardt iterated before initialization".to_string(),
                }
                .into());
            }
        };
        let cost = state.get_cost();

        let jtj = jac.t().dot(&jac);
        let grad = jac.t().dot(&r);
        let grad_inf = grad.iter().fold(0.0_f64, |m, g| m.max(g.abs()));
        if grad_inf <= self.tols.gtol {
            self.converge("gtol");
            return Ok((state, None));
        }

        let delta = match solve_damped(&jtj, &grad, self.damping) {
            Some(delta) => delta,
            None => {
                self.reject();
                if self.damping > MAX_DAMPING {
                    self.exit("damping overflow while solving the normal equations");
                }
                return Ok((state, None));
            }
        };

        let step_norm = delta.l2_norm();
        let theta_norm = theta.l2_norm();
        let small_step = step_norm <= self.tols.xtol * (self.tols.xtol + theta_norm);

        let trial = &theta + &delta;
        let r_trial = problem.apply(&trial)?;
        self.nfev += 1;
        let c_trial = half_sq_norm(&r_trial);

        let predicted = -(grad.dot(&delta) + 0.5 * delta.dot(&jtj.dot(&delta)));
        let actual = cost - c_trial;
        let rho = if predicted > 0.0 { actual / predicted } else { -1.0 };

        if c_trial.is_finite() && actual > 0.0 && rho > 0.0 {
            let jac_trial = problem.jacobian(&trial)?;
            self.residuals = Some(r_trial);
            self.jacobian = Some(jac_trial);
            self.damping *= (1.0_f64 / 3.0).max(1.0 - (2.0 * rho - 1.0).powi(3));
            self.nu = 2.0;

            if c_trial == 0.0 {
                self.converge("zero cost");
            } else if actual <= self.tols.ftol * cost {
                self.converge("ftol");
            } else if small_step {
                self.converge("xtol");
            } else if self.budget_exhausted() {
                self.exit("maximum number of function evaluations reached");
            }
            return Ok((state.param(trial).cost(c_trial), None));
        }

        self.reject();
        if small_step {
            self.converge("xtol");
        } else if self.budget_exhausted() {
            self.exit("maximum number of function evaluations reached");
        } else if self.damping > MAX_DAMPING {
            self.exit("damping overflow without an acceptable step");
        }
        Ok((state, None))
    }

    fn terminate(&mut self, _state: &IterState<Theta, (), (), (), (), f64>) -> TerminationStatus {
        self.status.clone()
    }
}

// ---- Helper Methods ----

/// Cost `½‖r‖²` of a residual vector.
pub(crate) fn half_sq_norm(r: &Residuals) -> Cost {
    0.5 * r.dot(r)
}

/// Solve `(A + λ·diag(A)) δ = −g` in nalgebra.
///
/// Returns `None` when neither Cholesky nor LU yields a finite solution.
fn solve_damped(jtj: &JacobianMatrix, grad: &Array1<f64>, damping: f64) -> Option<Theta> {
    let p = grad.len();
    let lhs = DMatrix::from_fn(p, p, |i, j| {
        if i == j { jtj[[i, i]] + damping * jtj[[i, i]].max(DIAG_FLOOR) } else { jtj[[i, j]] }
    });
    let rhs = DVector::from_iterator(p, grad.iter().map(|g| -g));

    let solution = match lhs.clone().cholesky() {
        Some(chol) => Some(chol.solve(&rhs)),
        None => lhs.lu().solve(&rhs),
    }?;
    if solution.iter().all(|v| v.is_finite()) {
        Some(Array1::from_iter(solution.iter().copied()))
    } else {
        None
    }
}
