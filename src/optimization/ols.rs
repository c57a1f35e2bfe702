//! optimization::ols: ordinary least squares via SVD.
//!
//! Purpose
//! -------
//! Solve `min_β ‖y − Xβ‖²` for a dense design matrix. Used for starting
//! values of nonlinear fits and for AR(1) plug-in bandwidth estimates.
//!
//! Key behaviors
//! -------------
//! - Bridges `ndarray` inputs into `nalgebra` and solves with a thin SVD,
//!   truncating singular values below `max(σ)·max(n, p)·ε`. Rank-deficient
//!   designs therefore return the minimum-norm solution instead of failing.
//!
//! Invariants & assumptions
//! ------------------------
//! - `design.nrows() == target.len()` and `n ≥ p ≥ 1`.
//! - All entries are finite; non-finite input surfaces as
//!   [`OptError::SingularSystem`].
use crate::optimization::errors::{OptError, OptResult};
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};

/// Ordinary least-squares coefficients `β̂` for `y ≈ Xβ`.
///
/// # Errors
/// - [`OptError::DesignDimMismatch`] when row counts disagree.
/// - [`OptError::Underdetermined`] when `n < p` or `p == 0`.
/// - [`OptError::SingularSystem`] when the SVD solve fails or the input
///   contains non-finite values.
pub fn ols(design: &Array2<f64>, target: &Array1<f64>) -> OptResult<Array1<f64>> {
    let (n, p) = design.dim();
    if n != target.len() {
        return Err(OptError::DesignDimMismatch { rows: n, target: target.len() });
    }
    if p == 0 || n < p {
        return Err(OptError::Underdetermined { rows: n, cols: p });
    }
    if design.iter().chain(target.iter()).any(|v| !v.is_finite()) {
        return Err(OptError::SingularSystem { reason: "design or target contains non-finite values" });
    }

    let x = DMatrix::from_fn(n, p, |i, j| design[[i, j]]);
    let y = DVector::from_iterator(n, target.iter().copied());
    let svd = x.svd(true, true);
    let sigma_max = svd.singular_values.max();
    let eps = sigma_max * (n.max(p) as f64) * f64::EPSILON;
    let beta = svd.solve(&y, eps).map_err(|reason| OptError::SingularSystem { reason })?;
    Ok(Array1::from_iter(beta.iter().copied()))
}
