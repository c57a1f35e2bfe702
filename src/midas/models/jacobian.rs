//! Residual Jacobian of the MIDAS regression.
//!
//! Purpose
//! -------
//! Build `∂r/∂θ` for `r = y − a − b·(X·w(κ)) − Y_lag·λ` with parameter layout
//! `θ = [a, b, κ₁..κ_k, λ₁..λ_ylag]`.
//!
//! Key behaviors
//! -------------
//! - [`closed_form_columns`]: the columns that are linear in the data,
//!   `−1`, `−X·w` and `−Y_lag`, in that order.
//! - [`kernel_columns`]: `−b·∂(X·w)/∂κⱼ` by central differences with the
//!   shared finite-difference step.
//! - [`assemble`] concatenates both blocks into the `θ` column order.
//!
//! Invariants & assumptions
//! ------------------------
//! - `closed_form_columns` returns `2 + ylag` columns; `kernel_columns`
//!   returns one column per kernel parameter.
//! - The kernel map is deterministic, so central differences are stable
//!   at the `1e-6` step for well-scaled lag data.
use crate::{
    midas::{
        core::kernels::WeightKernel,
        errors::{MidasError, MidasResult},
    },
    optimization::least_squares::{JacobianMatrix, central_jacobian},
};
use ndarray::{Array1, Array2, ArrayView2, Axis, concatenate, s};

/// Closed-form Jacobian columns `[−1, −X·w, −Y_lag]`.
pub fn closed_form_columns(weighted: &Array1<f64>, ar_lags: Option<&Array2<f64>>) -> Array2<f64> {
    let n = weighted.len();
    let ylag = ar_lags.map_or(0, |a| a.ncols());
    let mut cols = Array2::<f64>::zeros((n, 2 + ylag));
    cols.column_mut(0).fill(-1.0);
    cols.column_mut(1).assign(&weighted.mapv(|v| -v));
    if let Some(ar) = ar_lags {
        cols.slice_mut(s![.., 2..]).assign(&ar.mapv(|v| -v));
    }
    cols
}

/// Kernel-parameter Jacobian columns `−b·∂(X·w)/∂κ` by central differences.
///
/// # Errors
/// - Kernel errors for a zero-lag matrix or a wrong-length parameter vector.
pub fn kernel_columns(
    kernel: WeightKernel, regressors: ArrayView2<'_, f64>, kernel_params: &Array1<f64>,
    slope: f64, step: f64,
) -> MidasResult<Array2<f64>> {
    let d_weighted: JacobianMatrix = central_jacobian(
        kernel_params,
        step,
        |kp| kernel.weighted(regressors, kp),
        |expected, found| MidasError::DimensionMismatch {
            what: "weighted regressor",
            expected,
            found,
        },
    )?;
    Ok(d_weighted * -slope)
}

/// Concatenate closed-form and kernel columns into `[a, b, κ, λ]` order.
///
/// # Errors
/// - [`MidasError::DimensionMismatch`] when the blocks disagree on rows or
///   the closed-form block has fewer than two columns.
pub fn assemble(closed: &Array2<f64>, kernel: &Array2<f64>) -> MidasResult<JacobianMatrix> {
    if closed.nrows() != kernel.nrows() {
        return Err(MidasError::DimensionMismatch {
            what: "kernel Jacobian rows",
            expected: closed.nrows(),
            found: kernel.nrows(),
        });
    }
    if closed.ncols() < 2 {
        return Err(MidasError::DimensionMismatch {
            what: "closed-form Jacobian columns",
            expected: 2,
            found: closed.ncols(),
        });
    }
    concatenate(
        Axis(1),
        &[closed.slice(s![.., ..2]), kernel.view(), closed.slice(s![.., 2..])],
    )
    .map_err(|_| MidasError::DimensionMismatch {
        what: "assembled Jacobian",
        expected: closed.ncols() + kernel.ncols(),
        found: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::least_squares::FD_STEP;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Closed-form columns are the negated regressors of the linear part.
    //
    // Given
    // -----
    // - Weighted column (2, 3) and one AR column (5, 7).
    //
    // Expect
    // ------
    // - Rows (−1, −2, −5) and (−1, −3, −7).
    fn closed_form_columns_negate_linear_regressors() {
        // Arrange
        let xw = array![2.0, 3.0];
        let ar = array![[5.0], [7.0]];

        // Act
        let cols = closed_form_columns(&xw, Some(&ar));

        // Assert
        assert_eq!(cols, array![[-1.0, -2.0, -5.0], [-1.0, -3.0, -7.0]]);
        assert_eq!(closed_form_columns(&xw, None).ncols(), 2);
    }

    #[test]
    // Purpose
    // -------
    // Numeric kernel columns are exact for a kernel linear in its params.
    //
    // Given
    // -----
    // - Unrestricted kernel (w = κ) over a 2×3 lag matrix, slope 2.
    //
    // Expect
    // ------
    // - Columns equal `−2·X` to within FD rounding.
    fn kernel_columns_match_linear_kernel() {
        // Arrange
        let x = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let kp = array![0.2, 0.3, 0.5];

        // Act
        let cols = kernel_columns(WeightKernel::Unrestricted, x.view(), &kp, 2.0, FD_STEP).unwrap();

        // Assert
        for (got, want) in cols.iter().zip((&x * -2.0).iter()) {
            assert!((got - want).abs() < 1e-7, "{got} vs {want}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Exp-Almon kernel columns agree with the analytic derivative.
    //
    // Given
    // -----
    // - Two lags, κ = (−1, 0), one row x = (1, 0), slope 1.
    //
    // Expect
    // ------
    // - X·w = w₁ = 1/(1 + e^{κ₁ + 3κ₂}); derivatives
    //   ∂w₁/∂κ₁ = −w₁(1 − w₁), ∂w₁/∂κ₂ = −3w₁(1 − w₁), negated.
    fn kernel_columns_match_exp_almon_derivative() {
        // Arrange
        let x = array![[1.0, 0.0]];
        let kp = array![-1.0, 0.0];
        let w1 = 1.0 / (1.0 + (-1.0f64).exp());

        // Act
        let cols = kernel_columns(WeightKernel::ExpAlmon, x.view(), &kp, 1.0, FD_STEP).unwrap();

        // Assert
        let g = w1 * (1.0 - w1);
        assert!((cols[[0, 0]] - g).abs() < 1e-8);
        assert!((cols[[0, 1]] - 3.0 * g).abs() < 1e-8);
    }

    #[test]
    // Purpose
    // -------
    // Assembly places kernel columns between the slope and AR columns.
    //
    // Given
    // -----
    // - Closed block with columns (c0, c1, c2) and kernel block (k0, k1).
    //
    // Expect
    // ------
    // - Order (c0, c1, k0, k1, c2); a row mismatch is rejected.
    fn assemble_orders_columns_like_theta() {
        // Arrange
        let closed = array![[0.0, 1.0, 2.0]];
        let kernel = array![[10.0, 11.0]];

        // Act
        let j = assemble(&closed, &kernel).unwrap();

        // Assert
        assert_eq!(j, array![[0.0, 1.0, 10.0, 11.0, 2.0]]);
        assert!(matches!(
            assemble(&closed, &Array2::zeros((2, 2))),
            Err(MidasError::DimensionMismatch { .. })
        ));
    }
}
