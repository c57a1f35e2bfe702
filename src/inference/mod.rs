//! inference: standard errors for least-squares MIDAS estimates.
//!
//! Purpose
//! -------
//! Quantify parameter uncertainty after a MIDAS fit. The residual Jacobian
//! and residuals at `θ̂` are turned into classical Gauss–Newton or robust
//! (HAC sandwich) covariance matrices, then into standard errors,
//! t-statistics and Student-t p-values.
//!
//! Key behaviors
//! -------------
//! - [`HACOptions`] selects the kernel, bandwidth regime (fixed or
//!   plug-in), centering and small-sample correction.
//! - [`KernelType`] enumerates HAC tapers and the Andrews plug-in bandwidth
//!   rules (AR(1) fits by OLS).
//! - [`calculate_avg_scores_cov`] aggregates per-observation scores
//!   `g_t = J_t·r_t` into an average-score covariance.
//! - [`parameter_inference`] combines `(JᵀJ)⁺` with either `σ̂²` or the HAC
//!   "meat" and returns a [`ParameterInference`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Jacobians are `n×p` with rows indexing time; `n > p`.
//! - All routines report failures through [`InferenceResult`]; plug-in
//!   bandwidth failures fall back to `round(n^{1/4})` instead of erroring.
//!
//! Conventions
//! -----------
//! - Parameters are in the estimator's own space `[a, b, κ, λ]`; no
//!   reparameterisation is applied.
//! - No logging and no global state.
//!
//! Downstream usage
//! ----------------
//! - `MidasModel::standard_errors` evaluates the Jacobian and residuals at a
//!   fit and calls [`parameter_inference`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover kernel weights and plug-in bandwidths, HAC
//!   aggregation against hand-computed values, and covariance formulas
//!   against closed-form OLS standard errors.

pub mod covariance;
pub mod errors;
pub mod hac;
pub mod kernel;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::covariance::{ParameterInference, parameter_inference};
pub use self::errors::{InferenceError, InferenceResult};
pub use self::hac::{HACOptions, calculate_avg_scores_cov};
pub use self::kernel::KernelType;

// ---- Optional convenience prelude for downstream crates ------------------
//
// Downstream crates can `use rust_midas::inference::prelude::*;` to import
// the primary inference surface in a single line.

pub mod prelude {
    pub use super::covariance::{ParameterInference, parameter_inference};
    pub use super::errors::{InferenceError, InferenceResult};
    pub use super::hac::{HACOptions, calculate_avg_scores_cov};
    pub use super::kernel::KernelType;
}
