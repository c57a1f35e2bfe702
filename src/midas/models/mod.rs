//! models: MIDAS estimation, forecasting and fit results.
//!
//! Purpose
//! -------
//! Fit the MIDAS regression on an aligned estimation slice, forecast from a
//! fitted parameter vector, and expose post-estimation standard errors.
//!
//! Key behaviors
//! -------------
//! - [`MidasModel::fit`] starts from OLS on the default-weighted regressor
//!   and refines all parameters by Levenberg–Marquardt.
//! - [`MidasRegression`] implements
//!   [`ResidualModel`](crate::optimization::least_squares::ResidualModel)
//!   with a Jacobian assembled from closed-form and finite-difference
//!   columns ([`jacobian`]).
//! - [`predict`] evaluates `a + b·(X·w) + Y_lag·λ` on a forecast block.
//!
//! Conventions
//! -----------
//! - Parameter layout is always `[a, b, κ, λ]`.
//! - Solver diagnostics are logged with `tracing` (`debug!` on
//!   convergence, `warn!` otherwise) and stored on the [`FitResult`].

pub mod fit;
pub mod forecast;
pub mod jacobian;
pub mod midas;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::fit::{FitDiagnostics, FitResult};
pub use self::forecast::predict;
pub use self::jacobian::{assemble, closed_form_columns, kernel_columns};
pub use self::midas::{MidasModel, MidasRegression};
