//! least_squares: argmin-powered nonlinear least squares.
//!
//! Purpose
//! -------
//! Provide a high-level, Argmin-backed layer for minimizing sums of squared
//! residuals `c(θ) = ½‖r(θ)‖²`. Callers implement a single trait,
//! [`ResidualModel`], and invoke [`least_squares`] to run a
//! Levenberg–Marquardt solver with configurable tolerances and a
//! finite-difference Jacobian fallback.
//!
//! Key behaviors
//! -------------
//! - Expose residual models to Argmin as `Operator` + `Jacobian` via
//!   [`adapter::LsqAdapter`].
//! - Run [`solver::LevenbergMarquardt`], a custom Argmin `Solver` whose
//!   linear algebra lives in `nalgebra`, through [`run::run_lm`].
//! - Normalize results into an [`LsqOutcome`]. Non-convergence is reported
//!   through `converged`/`status`, never as an error.
//! - Provide central-difference Jacobians in [`finite_diff`], generic over
//!   the caller's error type so model layers can reuse them.
//!
//! Invariants & assumptions
//! ------------------------
//! - Residual models treat invalid inputs as recoverable [`OptError`]
//!   values, not panics. Non-finite residuals at trial points are allowed
//!   and cause the step to be rejected.
//! - Configuration types ([`Tolerances`], [`LsqOptions`]) are validated on
//!   construction.
//!
//! Conventions
//! -----------
//! - Jacobians are `n × p` (`∂r_t/∂θ_k` in row `t`, column `k`).
//! - Errors bubble up as [`OptResult<T>`] / [`OptError`].
//!
//! Downstream usage
//! ----------------
//! - The MIDAS estimator implements [`ResidualModel`] with a semi-analytic
//!   Jacobian and calls [`least_squares`] with [`LsqOptions`].
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover validation, FD accuracy, adapter
//!   fallbacks, solver termination paths, and outcome mapping.
//!
//! [`OptError`]: crate::optimization::errors::OptError
//! [`OptResult<T>`]: crate::optimization::errors::OptResult

pub mod adapter;
pub mod api;
pub mod finite_diff;
pub mod run;
pub mod solver;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::least_squares;
pub use self::finite_diff::central_jacobian;
pub use self::traits::{LsqOptions, LsqOutcome, ResidualModel, Tolerances};
pub use self::types::{Cost, FD_STEP, FnEvalMap, JacobianMatrix, Residuals, Theta};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_midas::optimization::least_squares::prelude::*;
//
// to import the main solver surface in a single line.

pub mod prelude {
    pub use super::api::least_squares;
    pub use super::traits::{LsqOptions, LsqOutcome, ResidualModel, Tolerances};
    pub use super::types::{JacobianMatrix, Residuals, Theta};
}
