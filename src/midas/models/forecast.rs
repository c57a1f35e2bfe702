//! Point forecasts from a fitted MIDAS regression.
//!
//! [`predict`] rebuilds the weighted regressor from the fitted kernel
//! parameters and returns `a + b·(X·w) + Y_lag·λ` for every row of a
//! forecast block. [`linear_predictor`] is the same map on a raw parameter
//! vector and is shared with the estimator's residual function.
use crate::midas::{
    core::kernels::WeightKernel,
    errors::{MidasError, MidasResult},
    models::fit::FitResult,
};
use ndarray::{Array1, ArrayView2, s};

/// Point forecasts for a forecast block.
///
/// `regressors` must have `fit.nlags` columns; `ar_lags` must be present with
/// `fit.ylag` columns iff the model has AR terms.
///
/// # Errors
/// - [`MidasError::DimensionMismatch`] on any shape disagreement.
pub fn predict(
    fit: &FitResult, regressors: ArrayView2<'_, f64>, ar_lags: Option<ArrayView2<'_, f64>>,
) -> MidasResult<Array1<f64>> {
    if regressors.ncols() != fit.nlags {
        return Err(MidasError::DimensionMismatch {
            what: "regressor lag columns",
            expected: fit.nlags,
            found: regressors.ncols(),
        });
    }
    let found_ylag = ar_lags.map_or(0, |a| a.ncols());
    if found_ylag != fit.ylag {
        return Err(MidasError::DimensionMismatch {
            what: "autoregressive lag columns",
            expected: fit.ylag,
            found: found_ylag,
        });
    }
    linear_predictor(fit.kernel, &fit.theta, regressors, ar_lags)
}

/// `a + b·(X·w(κ)) + Y_lag·λ` for `θ = [a, b, κ, λ]`.
///
/// # Errors
/// - [`MidasError::KernelParamLength`] when `θ` is too short for the kernel
///   and lag layout.
/// - [`MidasError::DimensionMismatch`] when row counts disagree.
pub(crate) fn linear_predictor(
    kernel: WeightKernel, theta: &Array1<f64>, regressors: ArrayView2<'_, f64>,
    ar_lags: Option<ArrayView2<'_, f64>>,
) -> MidasResult<Array1<f64>> {
    let nlags = regressors.ncols();
    let k = kernel.param_count(nlags);
    let ylag = ar_lags.map_or(0, |a| a.ncols());
    let expected = 2 + k + ylag;
    if theta.len() != expected {
        return Err(MidasError::KernelParamLength {
            kernel: kernel.name(),
            expected,
            actual: theta.len(),
        });
    }
    let kernel_params = theta.slice(s![2..2 + k]).to_owned();
    let weighted = kernel.weighted(regressors, &kernel_params)?;
    let mut fitted = weighted * theta[1] + theta[0];
    if let Some(ar) = ar_lags {
        if ar.nrows() != fitted.len() {
            return Err(MidasError::DimensionMismatch {
                what: "autoregressive lag rows",
                expected: fitted.len(),
                found: ar.nrows(),
            });
        }
        fitted += &ar.dot(&theta.slice(s![2 + k..]));
    }
    Ok(fitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midas::models::fit::FitDiagnostics;
    use ndarray::{Array2, array};

    fn unrestricted_fit(theta: Array1<f64>, nlags: usize, ylag: usize) -> FitResult {
        FitResult::new(
            theta.clone(),
            WeightKernel::Unrestricted,
            nlags,
            ylag,
            theta,
            FitDiagnostics::default(),
            0.0,
        )
        .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Forecasts combine intercept, weighted regressor and AR terms.
    //
    // Given
    // -----
    // - θ = (1, 2, w = (0.5, 0.5), λ = 0.1), rows x = (2, 4), y₋₁ = 10 and
    //   x = (0, 0), y₋₁ = 0.
    //
    // Expect
    // ------
    // - 1 + 2·3 + 1 = 8 and 1.
    fn predict_combines_all_terms() {
        // Arrange
        let fit = unrestricted_fit(array![1.0, 2.0, 0.5, 0.5, 0.1], 2, 1);
        let x = array![[2.0, 4.0], [0.0, 0.0]];
        let ar = array![[10.0], [0.0]];

        // Act
        let yhat = predict(&fit, x.view(), Some(ar.view())).unwrap();

        // Assert
        assert!((yhat[0] - 8.0).abs() < 1e-12);
        assert!((yhat[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Shape disagreements are reported instead of broadcasting.
    //
    // Given
    // -----
    // - A two-lag model with one AR lag; a 3-column block and a block with
    //   AR lags omitted.
    //
    // Expect
    // ------
    // - `DimensionMismatch` in both cases.
    fn predict_rejects_mismatched_blocks() {
        // Arrange
        let fit = unrestricted_fit(array![1.0, 2.0, 0.5, 0.5, 0.1], 2, 1);
        let wide = Array2::<f64>::zeros((1, 3));
        let narrow = Array2::<f64>::zeros((1, 2));

        // Act & Assert
        assert!(matches!(
            predict(&fit, wide.view(), None),
            Err(MidasError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            predict(&fit, narrow.view(), None),
            Err(MidasError::DimensionMismatch { what: "autoregressive lag columns", .. })
        ));
    }
}
