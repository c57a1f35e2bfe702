//! inference::covariance: Gauss–Newton and sandwich covariance for
//! least-squares estimates.
//!
//! Purpose
//! -------
//! Turn the residual Jacobian `J = ∂r/∂θ` and residuals `r` at a
//! least-squares optimum into parameter standard errors, t-statistics and
//! two-sided Student-t p-values.
//!
//! Key behaviors
//! -------------
//! - Classical: `Var(θ̂) = σ̂²·(JᵀJ)⁺` with `σ̂² = rᵀr/(n − p)`.
//! - Robust: `Var(θ̂) = (JᵀJ)⁺ · n·S · (JᵀJ)⁺`, where `S` is the HAC
//!   covariance of the average scores `g_t = J_t·r_t`
//!   ([`calculate_avg_scores_cov`]).
//! - The pseudoinverse comes from a symmetric eigendecomposition of `JᵀJ`
//!   (`nalgebra`), dropping eigenvalues below `λ_max·p·ε`; weakly identified
//!   directions therefore inflate rather than break the standard errors.
//!
//! Invariants & assumptions
//! ------------------------
//! - `J` is `n×p` with `n > p`, `r` has length `n`, `θ̂` length `p`.
//! - p-values use `n − p` degrees of freedom for both estimators.
//!
//! Testing notes
//! -------------
//! - Unit tests check the classical formula against closed-form OLS standard
//!   errors, finite sandwich estimates under IID and Bartlett kernels, and
//!   error paths for shapes, degrees of freedom and rank.
use crate::inference::{
    errors::{InferenceError, InferenceResult},
    hac::{HACOptions, calculate_avg_scores_cov},
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Standard errors and significance tests for one parameter vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterInference {
    pub estimates: Array1<f64>,
    pub std_errors: Array1<f64>,
    pub t_stats: Array1<f64>,
    /// Two-sided p-values from Student-t with `dof` degrees of freedom.
    pub p_values: Array1<f64>,
    pub dof: usize,
    /// `true` when a HAC sandwich was used.
    pub robust: bool,
}

/// Standard errors, t-statistics and p-values at `theta_hat`.
///
/// # Errors
/// - [`InferenceError::EmptyScores`] for an empty Jacobian.
/// - [`InferenceError::DimensionMismatch`] when shapes disagree.
/// - [`InferenceError::InsufficientDegreesOfFreedom`] when `n ≤ p`.
/// - [`InferenceError::SingularInformation`] when `JᵀJ` is numerically zero.
/// - [`InferenceError::StudentT`] if the reference distribution cannot be
///   built.
pub fn parameter_inference(
    theta_hat: &Array1<f64>, jacobian: &Array2<f64>, residuals: &Array1<f64>,
    hac: Option<&HACOptions>,
) -> InferenceResult<ParameterInference> {
    let (n, p) = jacobian.dim();
    if n == 0 || p == 0 {
        return Err(InferenceError::EmptyScores);
    }
    if residuals.len() != n {
        return Err(InferenceError::DimensionMismatch {
            what: "residuals",
            expected: n,
            found: residuals.len(),
        });
    }
    if theta_hat.len() != p {
        return Err(InferenceError::DimensionMismatch {
            what: "parameters",
            expected: p,
            found: theta_hat.len(),
        });
    }
    if n <= p {
        return Err(InferenceError::InsufficientDegreesOfFreedom { observations: n, parameters: p });
    }
    let dof = n - p;

    let info_inv = pseudo_inverse(&jacobian.t().dot(jacobian))?;
    let cov = match hac {
        None => {
            let sigma2 = residuals.dot(residuals) / dof as f64;
            info_inv * sigma2
        }
        Some(opts) => {
            let scores = jacobian * &residuals.view().insert_axis(Axis(1));
            let meat = calculate_avg_scores_cov(opts, &scores)? * n as f64;
            info_inv.dot(&meat).dot(&info_inv)
        }
    };

    let std_errors = cov.diag().mapv(|v| v.max(0.0).sqrt());
    let t_stats = theta_hat / &std_errors;
    let dist = StudentsT::new(0.0, 1.0, dof as f64)
        .map_err(|e| InferenceError::StudentT { reason: e.to_string() })?;
    let p_values = t_stats.mapv(|t| {
        if t.is_nan() { f64::NAN } else { (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0) }
    });

    Ok(ParameterInference {
        estimates: theta_hat.clone(),
        std_errors,
        t_stats,
        p_values,
        dof,
        robust: hac.is_some(),
    })
}

// ---- Helper methods ----

/// Moore–Penrose pseudoinverse of a symmetric PSD matrix via eigenvalue
/// truncation: `A⁺ = Σ_{λ_k > tol} q_k q_kᵀ / λ_k`.
fn pseudo_inverse(info: &Array2<f64>) -> InferenceResult<Array2<f64>> {
    let p = info.nrows();
    let info_nalg = DMatrix::<f64>::from_fn(p, p, |i, j| info[[i, j]]);
    let eigen = info_nalg.symmetric_eigen();
    let q = eigen.eigenvectors;
    let lambda_max = eigen.eigenvalues.iter().fold(0.0f64, |m, &l| m.max(l));
    if lambda_max <= 0.0 || !lambda_max.is_finite() {
        return Err(InferenceError::SingularInformation);
    }
    let tol = lambda_max * p as f64 * f64::EPSILON;

    let mut inv = Array2::<f64>::zeros((p, p));
    for (k, &lambda) in eigen.eigenvalues.iter().enumerate() {
        if lambda <= tol {
            continue;
        }
        for i in 0..p {
            let qi = q[(i, k)] / lambda;
            for j in 0..p {
                inv[[i, j]] += qi * q[(j, k)];
            }
        }
    }
    Ok(inv)
}
