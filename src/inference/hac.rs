//! inference::hac: HAC score covariance for sandwich standard errors.
//!
//! Purpose
//! -------
//! Build HAC (Heteroskedasticity & Autocorrelation Consistent) covariance
//! matrices of *average* per-observation scores. For a least-squares fit the
//! scores are `g_t = J_t·r_t` (row `t` of the residual Jacobian times the
//! residual). The estimator has the form
//!
//! ```text
//! S  =  Γ₀  +  ∑_{k=1}^{L} w_k ( Γ_k + Γ_kᵀ ),
//! Γ₀ = (1/n) GᵀG,
//! Γ_k = c_k · G_{k:}ᵀ G_{:n−k},
//! ```
//!
//! with `c_k = 1/(n − k)` under the Newey–West small-sample correction and
//! `c_k = 1/n` otherwise.
//!
//! Key behaviors
//! -------------
//! - Support IID outer products (`L = 0`) and HAC with a configurable
//!   kernel, bandwidth, centering and small-sample correction.
//! - A plug-in bandwidth (`bandwidth = None`) is chosen by
//!   [`KernelType::optimal_bandwidth`] on the same (possibly centered)
//!   scores that are aggregated.
//!
//! Invariants & assumptions
//! ------------------------
//! - Scores are `n×p` with `n ≥ 1`; empty input is an error.
//! - Bandwidth is truncated to `L ≤ n − 1`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover defaults, the IID reduction, centering invariance,
//!   symmetry, the small-sample correction and a hand-computed Bartlett case.
use crate::inference::{
    errors::{InferenceError, InferenceResult},
    kernel::KernelType,
};
use ndarray::{Array2, Axis, s};
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, cmp::min};

/// HACOptions: configuration for HAC score covariance estimation.
///
/// Fields
/// ------
/// - `kernel`: taper family controlling `w_k`.
/// - `bandwidth`: fixed `L` (truncated to `n − 1`) or `None` for plug-in.
/// - `center`: demean score columns before bandwidth selection and
///   aggregation.
/// - `small_sample_correction`: use `c_k = 1/(n − k)` instead of `1/n`.
///
/// Default: Bartlett, plug-in bandwidth, no centering, correction on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HACOptions {
    pub kernel: KernelType,
    pub bandwidth: Option<usize>,
    pub center: bool,
    pub small_sample_correction: bool,
}

impl HACOptions {
    /// Construct from explicit settings; no validation is needed since every
    /// combination is meaningful.
    ///
    /// ```rust
    /// # use rust_midas::inference::{HACOptions, KernelType};
    /// let opts = HACOptions::new(Some(4), KernelType::Parzen, false, true);
    /// assert_eq!(opts.bandwidth, Some(4));
    /// ```
    pub fn new(
        bandwidth: Option<usize>, kernel: KernelType, center: bool, small_sample_correction: bool,
    ) -> HACOptions {
        HACOptions { bandwidth, kernel, center, small_sample_correction }
    }
}

impl Default for HACOptions {
    fn default() -> Self {
        Self {
            bandwidth: None,
            kernel: KernelType::Bartlett,
            center: false,
            small_sample_correction: true,
        }
    }
}

/// Build a `p×p` HAC covariance matrix of average per-observation scores.
///
/// # Errors
/// - [`InferenceError::EmptyScores`] when `raw_scores` has no rows or no
///   columns.
///
/// ```rust
/// # use ndarray::array;
/// # use rust_midas::inference::{HACOptions, KernelType, calculate_avg_scores_cov};
/// let scores = array![[1.0, -1.0], [0.5, -0.5], [1.5, -1.5]];
/// let opts = HACOptions::new(None, KernelType::Bartlett, false, true);
/// let s = calculate_avg_scores_cov(&opts, &scores).unwrap();
/// assert_eq!(s.shape(), &[2, 2]);
/// ```
pub fn calculate_avg_scores_cov(
    hac_opts: &HACOptions, raw_scores: &Array2<f64>,
) -> InferenceResult<Array2<f64>> {
    let (n, p) = raw_scores.dim();
    if n == 0 || p == 0 {
        return Err(InferenceError::EmptyScores);
    }

    let scores: Cow<'_, Array2<f64>> = match (hac_opts.center, raw_scores.mean_axis(Axis(0))) {
        (true, Some(col_means)) => Cow::Owned(raw_scores - &col_means),
        _ => Cow::Borrowed(raw_scores),
    };

    let bandwidth = match hac_opts.bandwidth {
        Some(bw) => min(bw, n - 1),
        None => min(hac_opts.kernel.optimal_bandwidth(scores.as_ref()), n - 1),
    };

    let mut avg_scores = Array2::<f64>::zeros((p, p));
    for lag in 0..=bandwidth {
        add_hac_component(&mut avg_scores, scores.as_ref(), lag, bandwidth, hac_opts);
    }
    Ok(avg_scores)
}

// ---- Helper methods ----

/// Add the lag-`k` term to the accumulator: `(1/n) GᵀG` at `k = 0`,
/// `w_k (Γ_k + Γ_kᵀ)` otherwise. Requires `lag ≤ bandwidth ≤ n − 1`.
fn add_hac_component(
    avg_scores: &mut Array2<f64>, scores: &Array2<f64>, lag: usize, bandwidth: usize,
    hac_opts: &HACOptions,
) {
    let n = scores.nrows();
    if lag == 0 {
        avg_scores.scaled_add(1.0 / n as f64, &scores.t().dot(scores));
        return;
    }
    let weight = hac_opts.kernel.weight(lag as f64 / (bandwidth + 1) as f64);
    let scale = if hac_opts.small_sample_correction {
        1.0 / (n - lag) as f64
    } else {
        1.0 / n as f64
    };
    let gamma_k = scores.slice(s![lag.., ..]).t().dot(&scores.slice(s![..n - lag, ..])) * scale;
    avg_scores.scaled_add(weight, &gamma_k);
    avg_scores.scaled_add(weight, &gamma_k.t());
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    const TOL: f64 = 1e-10;

    fn assert_matrices_close(a: &Array2<f64>, b: &Array2<f64>, tol: f64) {
        assert_eq!(a.shape(), b.shape(), "shape mismatch: {:?} vs {:?}", a.shape(), b.shape());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_relative_eq!(*x, *y, epsilon = tol, max_relative = tol);
        }
    }

    #[test]
    // Purpose
    // -------
    // `HACOptions::default` matches the documented baseline.
    //
    // Given
    // -----
    // - No inputs.
    //
    // Expect
    // ------
    // - Plug-in bandwidth, Bartlett, no centering, correction on.
    fn hacoptions_default_matches_documented_defaults() {
        // Arrange
        let opts = HACOptions::default();

        // Act / Assert
        assert!(opts.bandwidth.is_none());
        assert_eq!(opts.kernel, KernelType::Bartlett);
        assert!(!opts.center);
        assert!(opts.small_sample_correction);
    }

    #[test]
    // Purpose
    // -------
    // With `L = 0` the estimator reduces to `(1/n) GᵀG`.
    //
    // Given
    // -----
    // - A 3×2 score matrix, IID kernel, bandwidth 0.
    //
    // Expect
    // ------
    // - Equality with the outer-product estimator.
    fn iid_with_zero_bandwidth_matches_outer_product() {
        // Arrange
        let scores = array![[1.0, 2.0], [3.0, 4.0], [-1.0, 0.5]];
        let opts = HACOptions::new(Some(0), KernelType::IID, false, true);

        // Act
        let hac_cov = calculate_avg_scores_cov(&opts, &scores).unwrap();

        // Assert
        let opg: Array2<f64> = scores.t().dot(&scores) / 3.0;
        assert_matrices_close(&hac_cov, &opg, TOL);
    }

    #[test]
    // Purpose
    // -------
    // Centering has no effect on exactly mean-zero scores, and the result
    // is symmetric.
    //
    // Given
    // -----
    // - A 4×2 score matrix whose columns sum to zero.
    //
    // Expect
    // ------
    // - Centered and uncentered estimates agree; `S = Sᵀ`.
    fn centering_is_a_no_op_for_mean_zero_scores() {
        // Arrange
        let scores = array![[1.0, -1.0], [-1.0, 1.0], [2.0, -2.0], [-2.0, 2.0]];
        let plain = HACOptions::new(Some(2), KernelType::Parzen, false, true);
        let centered = HACOptions { center: true, ..plain };

        // Act
        let a = calculate_avg_scores_cov(&plain, &scores).unwrap();
        let b = calculate_avg_scores_cov(&centered, &scores).unwrap();

        // Assert
        assert_matrices_close(&a, &b, TOL);
        assert_matrices_close(&a, &a.t().to_owned(), TOL);
    }

    #[test]
    // Purpose
    // -------
    // Match a hand-computed Bartlett / Newey–West estimate.
    //
    // Given
    // -----
    // - Scores (1, 0.5, −0.25, 2), requested bandwidth 10 (truncated to 3).
    //
    // Expect
    // ------
    // - Γ₀ + Σ_k (1 − k/4)·2Γ_k with Γ_k = Σ_t g_t g_{t−k} / (n − k).
    fn matches_manual_bartlett_newey_west() {
        // Arrange
        let g = [1.0, 0.5, -0.25, 2.0];
        let scores = Array2::from_shape_vec((4, 1), g.to_vec()).unwrap();
        let opts = HACOptions::new(Some(10), KernelType::Bartlett, false, true);

        // Act
        let cov = calculate_avg_scores_cov(&opts, &scores).unwrap();

        // Assert
        let n = g.len();
        let mut manual = g.iter().map(|v| v * v).sum::<f64>() / n as f64;
        for k in 1..n {
            let gamma: f64 = (k..n).map(|t| g[t] * g[t - k]).sum::<f64>() / (n - k) as f64;
            manual += 2.0 * (1.0 - k as f64 / 4.0) * gamma;
        }
        assert_relative_eq!(cov[[0, 0]], manual, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Empty score matrices are rejected.
    //
    // Given
    // -----
    // - A 0×2 matrix.
    //
    // Expect
    // ------
    // - `EmptyScores`.
    fn empty_scores_are_rejected() {
        // Arrange
        let scores = Array2::<f64>::zeros((0, 2));

        // Act & Assert
        assert_eq!(
            calculate_avg_scores_cov(&HACOptions::default(), &scores),
            Err(InferenceError::EmptyScores)
        );
    }
}
