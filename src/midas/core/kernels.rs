//! Parametric lag-weighting kernels.
//!
//! Purpose
//! -------
//! Map a small parameter vector onto a weight vector over `nlags`
//! high-frequency lags and collapse a lag matrix into one weighted
//! regressor column.
//!
//! Key behaviors
//! -------------
//! - [`WeightKernel::Beta`]: normalized Beta density on an epsilon-padded
//!   grid `u ∈ [ε, 1 − ε]`, `w ∝ u^(θ₁−1)(1−u)^(θ₂−1)`. With `shift` a
//!   third parameter `θ₃` is added uniformly and the result renormalized.
//! - [`WeightKernel::ExpAlmon`]: `w_i ∝ exp(θ₁·i + θ₂·i²)`, `i = 1..n`,
//!   evaluated with the exponent maximum subtracted so large parameters do
//!   not overflow.
//! - [`WeightKernel::Unrestricted`]: the parameter vector is the weight
//!   vector, one free weight per lag.
//! - [`WeightKernel::apply`] returns the weighted column `X·w` and the
//!   `rows × nlags` broadcast of `w`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `nlags ≥ 1`; zero lags is a configuration error.
//! - Column 0 of a lag matrix is the most recent lag, so kernels with
//!   decaying weights load on recent observations.
//! - Beta and Exp-Almon weights sum to one for every finite parameter
//!   vector that yields finite weights. Unrestricted weights sum to one at
//!   their initial values only.
//! - Numeric blowups (e.g. huge exponents) yield non-finite weights rather
//!   than errors, so the least-squares solver can reject the trial step.
use crate::midas::errors::{MidasError, MidasResult};
use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lag-weighting scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeightKernel {
    /// Beta polynomial; `shift` adds the uniform offset parameter `θ₃`.
    Beta { shift: bool },
    /// Exponential Almon polynomial with two parameters.
    ExpAlmon,
    /// One free weight per lag.
    Unrestricted,
}

impl WeightKernel {
    pub fn name(&self) -> &'static str {
        match self {
            WeightKernel::Beta { shift: false } => "beta",
            WeightKernel::Beta { shift: true } => "beta_shift",
            WeightKernel::ExpAlmon => "expalmon",
            WeightKernel::Unrestricted => "unrestricted",
        }
    }

    /// Number of kernel parameters for `nlags` lags.
    pub fn param_count(&self, nlags: usize) -> usize {
        match self {
            WeightKernel::Beta { shift: false } => 2,
            WeightKernel::Beta { shift: true } => 3,
            WeightKernel::ExpAlmon => 2,
            WeightKernel::Unrestricted => nlags,
        }
    }

    /// Default starting parameters.
    ///
    /// - Beta: `(1, 5)`, or `(1, 5, 0)` with shift (recent-lag-heavy decay).
    /// - Exp-Almon: `(−1, 0)` (monotone decay).
    /// - Unrestricted: `1/n` for each lag.
    pub fn initial_params(&self, nlags: usize) -> Array1<f64> {
        match self {
            WeightKernel::Beta { shift: false } => Array1::from(vec![1.0, 5.0]),
            WeightKernel::Beta { shift: true } => Array1::from(vec![1.0, 5.0, 0.0]),
            WeightKernel::ExpAlmon => Array1::from(vec![-1.0, 0.0]),
            WeightKernel::Unrestricted => {
                Array1::from_elem(nlags, 1.0 / (nlags.max(1) as f64))
            }
        }
    }

    /// Weight vector of length `nlags` for the given parameters.
    ///
    /// # Errors
    /// - [`MidasError::ZeroLags`] when `nlags == 0`.
    /// - [`MidasError::KernelParamLength`] when `params` has the wrong length.
    pub fn weights(&self, params: &Array1<f64>, nlags: usize) -> MidasResult<Array1<f64>> {
        if nlags == 0 {
            return Err(MidasError::ZeroLags);
        }
        let expected = self.param_count(nlags);
        if params.len() != expected {
            return Err(MidasError::KernelParamLength {
                kernel: self.name(),
                expected,
                actual: params.len(),
            });
        }
        let w = match self {
            WeightKernel::Beta { shift } => {
                let beta = beta_weights(params[0], params[1], nlags);
                if *shift { normalize(beta + params[2]) } else { beta }
            }
            WeightKernel::ExpAlmon => exp_almon_weights(params[0], params[1], nlags),
            WeightKernel::Unrestricted => params.clone(),
        };
        Ok(w)
    }

    /// Weighted regressor column `X·w` and the broadcast weight matrix.
    ///
    /// `x` is `rows × nlags` with the most recent lag in column 0.
    ///
    /// # Errors
    /// - Same as [`WeightKernel::weights`] with `nlags = x.ncols()`.
    pub fn apply(
        &self, x: ArrayView2<'_, f64>, params: &Array1<f64>,
    ) -> MidasResult<(Array1<f64>, Array2<f64>)> {
        let w = self.weights(params, x.ncols())?;
        let xw = x.dot(&w);
        let broadcast = w.broadcast((x.nrows(), x.ncols())).map(|b| b.to_owned());
        let broadcast = broadcast.unwrap_or_else(|| Array2::zeros((x.nrows(), x.ncols())));
        Ok((xw, broadcast))
    }

    /// Weighted regressor column only.
    pub fn weighted(&self, x: ArrayView2<'_, f64>, params: &Array1<f64>) -> MidasResult<Array1<f64>> {
        let w = self.weights(params, x.ncols())?;
        Ok(x.dot(&w))
    }
}

impl FromStr for WeightKernel {
    type Err = MidasError;

    /// Parse a kernel name (case-insensitive).
    ///
    /// Accepts `beta`, `beta_shift` / `betanz`, `expalmon` / `exp_almon`,
    /// `unrestricted` / `umidas`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beta" => Ok(WeightKernel::Beta { shift: false }),
            "beta_shift" | "betanz" | "beta_nz" => Ok(WeightKernel::Beta { shift: true }),
            "expalmon" | "exp_almon" => Ok(WeightKernel::ExpAlmon),
            "unrestricted" | "umidas" => Ok(WeightKernel::Unrestricted),
            _ => Err(MidasError::UnknownKernel { name: s.to_string() }),
        }
    }
}

impl std::fmt::Display for WeightKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---- Helper Methods ----

fn normalize(w: Array1<f64>) -> Array1<f64> {
    let total = w.sum();
    w / total
}

fn beta_weights(theta1: f64, theta2: f64, nlags: usize) -> Array1<f64> {
    if nlags == 1 {
        return Array1::from(vec![1.0]);
    }
    let eps = f64::EPSILON;
    let u = Array1::linspace(eps, 1.0 - eps, nlags);
    let raw = u.mapv(|ui| ui.powf(theta1 - 1.0) * (1.0 - ui).powf(theta2 - 1.0));
    normalize(raw)
}

fn exp_almon_weights(theta1: f64, theta2: f64, nlags: usize) -> Array1<f64> {
    let z = Array1::from_iter((1..=nlags).map(|i| {
        let i = i as f64;
        theta1 * i + theta2 * i * i
    }));
    let z_max = z.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
    normalize(z.mapv(|v| (v - z_max).exp()))
}
