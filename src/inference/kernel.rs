//! Kernel taps and plug-in bandwidths for HAC estimation.
//!
//! This module provides:
//! - A `KernelType` enum with common HAC tapers (IID, Bartlett/Newey–West,
//!   Parzen, Quadratic Spectral).
//! - Per-lag weights `w(x)` where `x = k/(L+1)`.
//! - A plug-in bandwidth selector `optimal_bandwidth` that fits an AR(1) to
//!   each score column by OLS and computes the Andrews `α(q)` (`q = 1` for
//!   Bartlett, `q = 2` for Parzen and QS). If the plug-in fails (near-unit
//!   root, too few rows, tiny denominator) it falls back to `round(n^{1/4})`.
//!
//! Conventions:
//! - Input `series_mat` is `n×p` (rows = time, cols = score components).
//! - The plug-in uses the same series that HAC will aggregate.
use crate::{
    inference::errors::{InferenceError, InferenceResult},
    optimization::ols::ols,
};
use ndarray::{Array2, ArrayView1, Axis, s, stack};
use serde::{Deserialize, Serialize};

/// Smallest admissible plug-in denominator.
const GENERAL_TOL: f64 = 1e-12;

/// Distance from the unit root below which AR(1) plug-ins are rejected.
const STATIONARITY_MARGIN: f64 = 1e-6;

/// HAC taper family.
///
/// - `IID`: no serial correlation; only `k = 0` contributes.
/// - `Bartlett`: triangular (Newey–West) kernel, support `|x| ≤ 1`.
/// - `Parzen`: smoother compact-support kernel.
/// - `QuadraticSpectral`: infinite-support taper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KernelType {
    IID,
    Bartlett,
    Parzen,
    QuadraticSpectral,
}

impl KernelType {
    /// Kernel weight `w(x)`, typically at `x = k/(L+1)`.
    pub fn weight(&self, input: f64) -> f64 {
        let x = input.abs();
        match self {
            KernelType::IID => (input == 0.0) as u8 as f64,
            KernelType::Bartlett if x <= 1.0 => 1.0 - x,
            KernelType::Parzen if x <= 0.5 => 1.0 - 6.0 * x * x + 6.0 * x * x * x,
            KernelType::Parzen if x <= 1.0 => 2.0 * (1.0 - x).powi(3),
            KernelType::Bartlett | KernelType::Parzen => 0.0,
            KernelType::QuadraticSpectral if input == 0.0 => 1.0,
            KernelType::QuadraticSpectral => {
                let pi_x = std::f64::consts::PI * input;
                let z = 6.0 * pi_x / 5.0;
                25.0 / (12.0 * pi_x * pi_x) * (z.sin() / z - z.cos())
            }
        }
    }

    /// Plug-in bandwidth `L` for this kernel.
    ///
    /// - Bartlett: `1.1447·(n·α(1))^{1/3}`.
    /// - Parzen: `2.6614·(n·α(2))^{1/5}`.
    /// - Quadratic Spectral: `1.3221·(n·α(2))^{1/5}`.
    /// - IID: `0`.
    ///
    /// Falls back to `round(n^{1/4})` when `α` cannot be computed. Callers
    /// truncate the result to `n − 1`.
    pub fn optimal_bandwidth(&self, series_mat: &Array2<f64>) -> usize {
        let n = series_mat.nrows() as f64;
        let (ord, constant, exponent) = match self {
            KernelType::IID => return 0,
            KernelType::Bartlett => (1, 1.1447, 1.0 / 3.0),
            KernelType::Parzen => (2, 2.6614, 1.0 / 5.0),
            KernelType::QuadraticSpectral => (2, 1.3221, 1.0 / 5.0),
        };
        match calc_opt_bandwidth_param(series_mat, ord) {
            Ok(alpha) => (constant * (n * alpha).powf(exponent)).round() as usize,
            Err(_) => n.powf(0.25).round() as usize,
        }
    }
}

/// Andrews plug-in `α(q)` aggregated across columns.
///
/// For each column: fit `x_t = c + φ·x_{t−1} + e_t` by OLS, reject
/// `|φ| ≥ 1 − margin`, estimate `σ²` from the residuals (`n − 1`
/// denominator), and accumulate the `q = 1` or `q = 2` terms.
///
/// # Errors
/// - `SeriesTooShort` for fewer than three rows.
/// - `StationarityViolated { φ }` near a unit root.
/// - `OrderNotSupported { ord }` for `q ∉ {1, 2}`.
/// - `DenominatorTooSmall` when the final denominator is numerically zero.
/// - `AuxiliaryRegression` when the AR(1) OLS fails.
fn calc_opt_bandwidth_param(series_mat: &Array2<f64>, ord: usize) -> InferenceResult<f64> {
    if series_mat.nrows() < 3 {
        return Err(InferenceError::SeriesTooShort { len: series_mat.nrows() });
    }
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for col in series_mat.columns() {
        let (phi, sigma2) = fit_ar1(col)?;
        if phi.abs() >= 1.0 - STATIONARITY_MARGIN {
            return Err(InferenceError::StationarityViolated { phi });
        }
        let sigma4 = sigma2 * sigma2;
        let phi_squared = phi * phi;
        denominator += sigma4 / (1.0 - phi_squared).powi(4);
        let scaled = 4.0 * phi_squared * sigma4;
        numerator += match ord {
            1 => scaled / ((1.0 - phi).powi(6) * (1.0 + phi).powi(2)),
            2 => scaled / (1.0 - phi).powi(8),
            _ => return Err(InferenceError::OrderNotSupported { ord }),
        };
    }
    if denominator < GENERAL_TOL {
        return Err(InferenceError::DenominatorTooSmall { denominator });
    }
    Ok(numerator / denominator)
}

/// OLS AR(1) fit returning `(φ, σ²)`.
fn fit_ar1(col: ArrayView1<'_, f64>) -> InferenceResult<(f64, f64)> {
    let n = col.len();
    let lagged = col.slice(s![..n - 1]);
    let current = col.slice(s![1..]).to_owned();
    let ones = ndarray::Array1::<f64>::ones(n - 1);
    let design = stack(Axis(1), &[ones.view(), lagged])
        .map_err(|_| InferenceError::DimensionMismatch {
            what: "AR(1) design",
            expected: n - 1,
            found: lagged.len(),
        })?;
    let coef = ols(&design, &current)?;
    let resid = &current - &design.dot(&coef);
    let sigma2 = resid.mapv(|e| e * e).sum() / (resid.len() - 1) as f64;
    Ok((coef[1], sigma2))
}
