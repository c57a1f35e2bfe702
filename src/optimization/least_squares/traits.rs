//! Public API surface for nonlinear least squares.
//!
//! - [`ResidualModel`]: trait users implement for their model.
//! - [`LsqOptions`] and [`Tolerances`]: configuration for the solver.
//! - [`LsqOutcome`]: normalized result returned by the high-level
//!   `least_squares` API.
//!
//! Convention: we minimize `c(θ) = ½‖r(θ)‖²` where `r(θ)` is the residual
//! vector returned by the model. An analytic Jacobian, if provided, is
//! `∂r/∂θ` (not the derivative of the cost).
use crate::optimization::{
    errors::{OptError, OptResult},
    least_squares::{
        types::{Cost, DEFAULT_DAMPING, FnEvalMap, JacobianMatrix, Residuals, Theta},
        validation::{
            validate_theta_hat, verify_damping, verify_ftol, verify_gtol, verify_max_nfev,
            verify_xtol,
        },
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use serde::{Deserialize, Serialize};

/// User-implemented residual interface.
///
/// - `type Data`: per-model data carried into `residuals`/`jacobian`/`check`.
///
/// Required:
/// - `residuals(&Theta, &Data) -> OptResult<Residuals>`: evaluate `r(θ)`.
///   Non-finite entries are allowed at trial points; the solver rejects such
///   steps and raises its damping.
/// - `check(&Theta, &Data) -> OptResult<()>`: validation hook called once
///   before optimization.
///
/// Optional:
/// - `jacobian(&Theta, &Data) -> OptResult<JacobianMatrix>`: analytic
///   `∂r/∂θ`. If not implemented, central finite differences are used.
pub trait ResidualModel {
    type Data;

    // Required methods
    fn residuals(&self, theta: &Theta, data: &Self::Data) -> OptResult<Residuals>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn jacobian(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<JacobianMatrix> {
        Err(OptError::JacobianNotImplemented)
    }
}

/// Stopping rules for the Levenberg–Marquardt solver.
///
/// - `xtol`: stop when `‖δ‖ ≤ xtol·(xtol + ‖θ‖)`.
/// - `ftol`: stop when an accepted step reduces the cost by less than
///   `ftol·c(θ)`.
/// - `gtol`: stop when `‖Jᵀr‖_∞ ≤ gtol`.
/// - `max_nfev`: hard cap on residual evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    pub xtol: f64,
    pub ftol: f64,
    pub gtol: f64,
    pub max_nfev: usize,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Rules
    /// - `xtol`, `ftol`, `gtol` must be **finite and strictly positive**.
    /// - `max_nfev` must be `> 0`.
    ///
    /// # Errors
    /// - [`OptError::InvalidXTol`] / [`OptError::InvalidFTol`] /
    ///   [`OptError::InvalidGTol`] for bad tolerances.
    /// - [`OptError::InvalidMaxNfev`] if `max_nfev == 0`.
    pub fn new(xtol: f64, ftol: f64, gtol: f64, max_nfev: usize) -> OptResult<Self> {
        verify_xtol(xtol)?;
        verify_ftol(ftol)?;
        verify_gtol(gtol)?;
        verify_max_nfev(max_nfev)?;
        Ok(Self { xtol, ftol, gtol, max_nfev })
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { xtol: 1e-9, ftol: 1e-9, gtol: 1e-12, max_nfev: 5000 }
    }
}

/// Solver-level configuration.
///
/// Fields:
/// - `tols: Tolerances`: stopping rules and the evaluation cap.
/// - `initial_damping: f64`: starting Marquardt factor `λ₀`.
/// - `verbose: bool`: if `true`, attaches an observer (behind the `obs_slog`
///   feature) and prints the initial cost.
///
/// Default:
/// - `tols`: `xtol = 1e-9`, `ftol = 1e-9`, `gtol = 1e-12`, `max_nfev = 5000`
/// - `initial_damping`: `1e-3`
/// - `verbose`: `false`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LsqOptions {
    pub tols: Tolerances,
    pub initial_damping: f64,
    pub verbose: bool,
}

impl LsqOptions {
    /// Create a new set of solver options.
    ///
    /// # Errors
    /// - [`OptError::InvalidDamping`] if `initial_damping` is non-finite or ≤ 0.
    pub fn new(tols: Tolerances, initial_damping: f64, verbose: bool) -> OptResult<Self> {
        verify_damping(initial_damping)?;
        Ok(Self { tols, initial_damping, verbose })
    }
}

impl Default for LsqOptions {
    fn default() -> Self {
        Self { tols: Tolerances::default(), initial_damping: DEFAULT_DAMPING, verbose: false }
    }
}

/// Canonical result returned by `least_squares`.
///
/// - `theta_hat`: best parameter vector found.
/// - `cost`: `½‖r(θ̂)‖²`.
/// - `residual_norm`: `‖r(θ̂)‖`.
/// - `converged`: `true` only when a convergence criterion fired. Hitting the
///   evaluation or iteration cap leaves it `false`; `theta_hat` is still the
///   best point seen.
/// - `status`: human-readable termination status.
/// - `iterations`: number of solver iterations performed.
/// - `fn_evals`: evaluation counters reported by `argmin`.
#[derive(Debug, Clone, PartialEq)]
pub struct LsqOutcome {
    pub theta_hat: Theta,
    pub cost: Cost,
    pub residual_norm: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
}

impl LsqOutcome {
    /// Build a validated [`LsqOutcome`] from raw solver state.
    ///
    /// Performs:
    /// - `theta_hat` check via `validate_theta_hat` (present and all finite).
    /// - `cost` finiteness check.
    /// - Maps `TerminationStatus` into `(converged, status)`.
    ///
    /// # Errors
    /// - Propagates validation errors for `theta_hat`.
    /// - [`OptError::NonFiniteResidual`] when the best cost is not finite.
    pub fn new(
        theta_hat_opt: Option<Theta>, cost: Cost, termination: TerminationStatus,
        iterations: u64, fn_evals: FnEvalMap,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        if !cost.is_finite() {
            return Err(OptError::NonFiniteResidual { index: 0, value: cost });
        }
        let (converged, status) = match termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            TerminationStatus::Terminated(TerminationReason::SolverConverged) => {
                (true, "Solver converged".to_string())
            }
            TerminationStatus::Terminated(TerminationReason::TargetCostReached) => {
                (true, "Target cost reached".to_string())
            }
            TerminationStatus::Terminated(TerminationReason::SolverExit(msg)) => (false, msg),
            TerminationStatus::Terminated(other) => (false, format!("{other:?}")),
        };
        Ok(Self {
            theta_hat,
            cost,
            residual_norm: (2.0 * cost).sqrt(),
            converged,
            status,
            iterations: iterations as usize,
            fn_evals,
        })
    }

    /// Number of residual evaluations performed.
    pub fn nfev(&self) -> u64 {
        self.fn_evals.get("operator_count").copied().unwrap_or(0)
    }

    /// Number of Jacobian evaluations performed.
    pub fn njev(&self) -> u64 {
        self.fn_evals.get("jacobian_count").copied().unwrap_or(0)
    }
}
