//! least_squares::types: shared numeric aliases for the least-squares layer.
//!
//! Purpose
//! -------
//! Centralize the numeric types used by the nonlinear least-squares solver
//! so the rest of the optimization code stays agnostic to `ndarray` and
//! Argmin generics.
//!
//! Conventions
//! -----------
//! - `Theta` is the free parameter vector, length `p`.
//! - `Residuals` has one entry per observation, length `n`.
//! - `JacobianMatrix` is `n × p`, row `t` holding `∂r_t/∂θ`.
//! - `Cost` is always `½‖r‖²`.
//!
//! Testing notes
//! -------------
//! - Aliases and constants only; exercised indirectly by the solver tests.
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Parameter vector `θ`.
pub type Theta = Array1<f64>;

/// Residual vector `r(θ)`.
pub type Residuals = Array1<f64>;

/// Dense Jacobian `∂r/∂θ` with shape `n × p`.
pub type JacobianMatrix = Array2<f64>;

/// Scalar objective `½‖r(θ)‖²`.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps counter names (`"operator_count"`, `"jacobian_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Absolute step used by central finite differences.
pub const FD_STEP: f64 = 1e-6;

/// Floor applied to the diagonal of `JᵀJ` before Marquardt scaling.
pub const DIAG_FLOOR: f64 = 1e-12;

/// Damping factor beyond which the solver gives up.
pub const MAX_DAMPING: f64 = 1e16;

/// Default initial damping factor `λ₀`.
pub const DEFAULT_DAMPING: f64 = 1e-3;
