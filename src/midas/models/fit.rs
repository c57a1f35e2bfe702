//! Fitted MIDAS parameters and solver diagnostics.
//!
//! Purpose
//! -------
//! Carry the estimated parameter vector `θ̂ = [a, b, κ, λ]` together with the
//! kernel and lag layout needed to interpret it, the OLS starting vector, and
//! the diagnostics reported by the least-squares solver.
//!
//! Invariants & assumptions
//! ------------------------
//! - `theta.len() == 2 + kernel.param_count(nlags) + ylag`, checked by
//!   [`FitResult::new`].
//! - A non-converged fit is still a valid fit; `diagnostics.converged`
//!   records the solver outcome and callers decide whether to use it.
use crate::{
    midas::{
        core::kernels::WeightKernel,
        errors::{MidasError, MidasResult},
    },
    optimization::least_squares::LsqOutcome,
};
use ndarray::{Array1, ArrayView1, s};
use serde::{Deserialize, Serialize};

/// Solver diagnostics attached to a fit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FitDiagnostics {
    pub converged: bool,
    pub status: String,
    /// `‖r(θ̂)‖₂`.
    pub residual_norm: f64,
    /// `½‖r(θ̂)‖²`.
    pub cost: f64,
    pub iterations: usize,
    /// Residual evaluations.
    pub nfev: u64,
    /// Jacobian evaluations.
    pub njev: u64,
}

impl From<&LsqOutcome> for FitDiagnostics {
    fn from(outcome: &LsqOutcome) -> Self {
        Self {
            converged: outcome.converged,
            status: outcome.status.clone(),
            residual_norm: outcome.residual_norm,
            cost: outcome.cost,
            iterations: outcome.iterations,
            nfev: outcome.nfev(),
            njev: outcome.njev(),
        }
    }
}

/// Estimated MIDAS regression.
///
/// Parameter layout: intercept `a`, slope `b`, kernel parameters `κ`
/// (`kernel.param_count(nlags)` entries), AR coefficients `λ` (`ylag`
/// entries, lag 1 first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub theta: Array1<f64>,
    pub kernel: WeightKernel,
    pub nlags: usize,
    pub ylag: usize,
    /// Starting vector handed to the nonlinear solver.
    pub ols_start: Array1<f64>,
    pub diagnostics: FitDiagnostics,
    /// Root-mean-square in-sample residual at `θ̂`.
    pub in_sample_rmse: f64,
}

impl FitResult {
    /// Assemble a fit, checking the parameter layout.
    ///
    /// # Errors
    /// - [`MidasError::DimensionMismatch`] when `theta` or `ols_start` do not
    ///   have `2 + k + ylag` entries.
    pub fn new(
        theta: Array1<f64>, kernel: WeightKernel, nlags: usize, ylag: usize,
        ols_start: Array1<f64>, diagnostics: FitDiagnostics, in_sample_rmse: f64,
    ) -> MidasResult<Self> {
        let expected = 2 + kernel.param_count(nlags) + ylag;
        for (what, found) in [("fitted parameters", theta.len()), ("starting parameters", ols_start.len())] {
            if found != expected {
                return Err(MidasError::DimensionMismatch { what, expected, found });
            }
        }
        Ok(Self { theta, kernel, nlags, ylag, ols_start, diagnostics, in_sample_rmse })
    }

    pub fn intercept(&self) -> f64 {
        self.theta[0]
    }

    pub fn slope(&self) -> f64 {
        self.theta[1]
    }

    pub fn kernel_params(&self) -> ArrayView1<'_, f64> {
        self.theta.slice(s![2..2 + self.kernel_param_count()])
    }

    /// AR coefficients, lag 1 first; empty when `ylag == 0`.
    pub fn ar_coefficients(&self) -> ArrayView1<'_, f64> {
        self.theta.slice(s![2 + self.kernel_param_count()..])
    }

    /// Fitted lag weights over the `nlags` high-frequency lags.
    pub fn weights(&self) -> MidasResult<Array1<f64>> {
        self.kernel.weights(&self.kernel_params().to_owned(), self.nlags)
    }

    pub fn converged(&self) -> bool {
        self.diagnostics.converged
    }

    // ---- Helper Methods ----

    fn kernel_param_count(&self) -> usize {
        self.kernel.param_count(self.nlags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Accessors split θ according to the kernel and AR layout.
    //
    // Given
    // -----
    // - Beta kernel (2 params), 6 lags, 2 AR lags, θ = (1, 2, 3, 4, 5, 6).
    //
    // Expect
    // ------
    // - a = 1, b = 2, κ = (3, 4), λ = (5, 6), and six weights summing to one.
    fn accessors_split_theta() {
        // Arrange
        let theta = array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let kernel = WeightKernel::Beta { shift: false };

        // Act
        let fit =
            FitResult::new(theta.clone(), kernel, 6, 2, theta, FitDiagnostics::default(), 0.0)
                .unwrap();

        // Assert
        assert_eq!(fit.intercept(), 1.0);
        assert_eq!(fit.slope(), 2.0);
        assert_eq!(fit.kernel_params().to_vec(), vec![3.0, 4.0]);
        assert_eq!(fit.ar_coefficients().to_vec(), vec![5.0, 6.0]);
        let w = fit.weights().unwrap();
        assert_eq!(w.len(), 6);
        assert!((w.sum() - 1.0).abs() < 1e-12);
        assert!(!fit.converged());
    }

    #[test]
    // Purpose
    // -------
    // Layout mismatches are rejected at construction.
    //
    // Given
    // -----
    // - Exp-Almon with 3 lags and no AR terms (needs 4 entries), θ of 5.
    //
    // Expect
    // ------
    // - `DimensionMismatch` naming the fitted parameters.
    fn new_rejects_wrong_layout() {
        // Arrange
        let theta = Array1::zeros(5);

        // Act
        let res = FitResult::new(
            theta.clone(),
            WeightKernel::ExpAlmon,
            3,
            0,
            theta,
            FitDiagnostics::default(),
            0.0,
        );

        // Assert
        assert_eq!(
            res,
            Err(MidasError::DimensionMismatch { what: "fitted parameters", expected: 4, found: 5 })
        );
    }
}
