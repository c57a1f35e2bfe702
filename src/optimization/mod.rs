//! optimization: least-squares stack and unified error surface.
//!
//! Purpose
//! -------
//! Provide the fitting layer used by the MIDAS estimator: an Argmin-backed
//! Levenberg–Marquardt solver for nonlinear least squares, an SVD-based
//! ordinary least-squares routine, and a single error/result surface.
//!
//! Key behaviors
//! -------------
//! - Expose [`least_squares`](least_squares::least_squares) for minimizing
//!   `½‖r(θ)‖²` over a user [`ResidualModel`](least_squares::ResidualModel).
//! - Expose [`ols`](ols::ols) for linear starting values and auxiliary
//!   regressions.
//! - Normalize configuration issues, numerical failures, and backend solver
//!   errors into [`errors::OptError`] with the alias `OptResult<T>`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Solvers assume finite inputs once validation has passed; invalid states
//!   are reported as `OptError`, not panics.
//!
//! Conventions
//! -----------
//! - Vectors and matrices are `ndarray` containers over `f64`; `nalgebra`
//!   only appears internally for factorizations.
//! - Public entrypoints that can fail return `OptResult<T>`; callers never
//!   see raw Argmin errors.
//!
//! Downstream usage
//! ----------------
//! - Front-ends typically import `optimization::prelude::*`.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; the MIDAS integration tests
//!   exercise the solver end to end.

pub mod errors;
pub mod least_squares;
pub mod ols;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::least_squares::prelude::*;
    pub use super::ols::ols;
}
