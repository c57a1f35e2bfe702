//! Validation helpers for nonlinear least squares.
//!
//! This module centralizes the consistency checks used across the
//! least-squares interface:
//!
//! - **Tolerance checks**: [`verify_xtol`], [`verify_ftol`], [`verify_gtol`]
//!   ensure numeric tolerances are finite and strictly positive.
//! - **Budget checks**: [`verify_max_nfev`], [`verify_damping`].
//! - **Residual / Jacobian validation**: [`validate_residuals`],
//!   [`validate_jacobian`] enforce shape and finiteness.
//! - **Parameters**: [`validate_theta_input`], [`validate_theta_hat`].
use crate::optimization::{
    errors::{OptError, OptResult},
    least_squares::types::{JacobianMatrix, Residuals, Theta},
};

/// Validate the relative step tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidXTol`] if the value is non-finite or ≤ 0.0.
pub fn verify_xtol(tol: f64) -> OptResult<()> {
    if !tol.is_finite() {
        return Err(OptError::InvalidXTol { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(OptError::InvalidXTol { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

/// Validate the relative cost-reduction tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidFTol`] if the value is non-finite or ≤ 0.0.
pub fn verify_ftol(tol: f64) -> OptResult<()> {
    if !tol.is_finite() {
        return Err(OptError::InvalidFTol { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(OptError::InvalidFTol { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

/// Validate the gradient tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidGTol`] if the value is non-finite or ≤ 0.0.
pub fn verify_gtol(tol: f64) -> OptResult<()> {
    if !tol.is_finite() {
        return Err(OptError::InvalidGTol { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(OptError::InvalidGTol { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

/// Validate the residual-evaluation budget.
///
/// # Errors
/// Returns [`OptError::InvalidMaxNfev`] if `max_nfev == 0`.
pub fn verify_max_nfev(max_nfev: usize) -> OptResult<()> {
    if max_nfev == 0 {
        return Err(OptError::InvalidMaxNfev {
            max_nfev,
            reason: "Maximum function evaluations must be greater than zero.",
        });
    }
    Ok(())
}

/// Validate the initial Levenberg–Marquardt damping factor.
///
/// # Errors
/// Returns [`OptError::InvalidDamping`] if the value is non-finite or ≤ 0.0.
pub fn verify_damping(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::InvalidDamping { value, reason: "Damping must be finite." });
    }
    if value <= 0.0 {
        return Err(OptError::InvalidDamping { value, reason: "Damping must be positive." });
    }
    Ok(())
}

/// Validate a residual vector.
///
/// Checks that the vector is non-empty and every entry is finite.
///
/// # Errors
/// - [`OptError::EmptyResiduals`] for an empty vector.
/// - [`OptError::NonFiniteResidual`] for the first NaN or ±∞ entry.
pub fn validate_residuals(residuals: &Residuals) -> OptResult<()> {
    if residuals.is_empty() {
        return Err(OptError::EmptyResiduals);
    }
    for (index, &value) in residuals.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::NonFiniteResidual { index, value });
        }
    }
    Ok(())
}

/// Validate the shape and entries of a Jacobian matrix.
///
/// # Checks
/// 1. Matrix dimensions must equal `rows × cols`.
/// 2. All entries must be finite.
///
/// # Errors
/// - [`OptError::JacobianDimMismatch`] if dimensions do not match.
/// - [`OptError::InvalidJacobian`] for the first non-finite entry.
pub fn validate_jacobian(jacobian: &JacobianMatrix, rows: usize, cols: usize) -> OptResult<()> {
    if jacobian.nrows() != rows || jacobian.ncols() != cols {
        return Err(OptError::JacobianDimMismatch {
            expected: (rows, cols),
            found: (jacobian.nrows(), jacobian.ncols()),
        });
    }
    for ((row, col), &value) in jacobian.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidJacobian { row, col, value });
        }
    }
    Ok(())
}

/// Validate an initial parameter vector.
///
/// # Errors
/// - [`OptError::EmptyTheta`] when `theta` has no entries.
/// - [`OptError::InvalidThetaInput`] for the first non-finite entry.
pub fn validate_theta_input(theta: &Theta) -> OptResult<()> {
    if theta.is_empty() {
        return Err(OptError::EmptyTheta);
    }
    for (index, &value) in theta.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidThetaInput { index, value });
        }
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector (`theta_hat`).
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2, array};

    #[test]
    // Purpose
    // -------
    // Confirm tolerance checks reject zero, negative, and non-finite values
    // while accepting small positive tolerances.
    //
    // Given
    // -----
    // - A set of bad tolerances and one good one.
    //
    // Expect
    // ------
    // - Bad values map to the matching error variant; `1e-9` passes.
    fn tolerance_checks_reject_non_positive_and_non_finite() {
        // Arrange
        let bad = [0.0, -1.0, f64::NAN, f64::INFINITY];

        // Act & Assert
        for tol in bad {
            assert!(matches!(verify_xtol(tol), Err(OptError::InvalidXTol { .. })));
            assert!(matches!(verify_ftol(tol), Err(OptError::InvalidFTol { .. })));
            assert!(matches!(verify_gtol(tol), Err(OptError::InvalidGTol { .. })));
            assert!(matches!(verify_damping(tol), Err(OptError::InvalidDamping { .. })));
        }
        assert!(verify_xtol(1e-9).is_ok());
        assert!(verify_max_nfev(1).is_ok());
        assert!(verify_max_nfev(0).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Check that residual validation pinpoints the first non-finite entry.
    //
    // Given
    // -----
    // - An empty vector and a vector with NaN at index 1.
    //
    // Expect
    // ------
    // - `EmptyResiduals` and `NonFiniteResidual { index: 1, .. }` respectively.
    fn validate_residuals_reports_empty_and_non_finite() {
        // Arrange
        let empty: Residuals = Array1::zeros(0);
        let bad = array![0.5, f64::NAN, 1.0];

        // Act
        let e1 = validate_residuals(&empty);
        let e2 = validate_residuals(&bad);

        // Assert
        assert_eq!(e1, Err(OptError::EmptyResiduals));
        assert!(matches!(e2, Err(OptError::NonFiniteResidual { index: 1, .. })));
    }

    #[test]
    // Purpose
    // -------
    // Ensure Jacobian validation enforces both shape and finiteness.
    //
    // Given
    // -----
    // - A 3×2 Jacobian checked against 3×2 and 2×2, then poisoned with ∞.
    //
    // Expect
    // ------
    // - Ok for the matching shape, dimension mismatch otherwise, and
    //   `InvalidJacobian` at the poisoned cell.
    fn validate_jacobian_checks_shape_and_entries() {
        // Arrange
        let mut jac = Array2::<f64>::ones((3, 2));

        // Act & Assert
        assert!(validate_jacobian(&jac, 3, 2).is_ok());
        assert_eq!(
            validate_jacobian(&jac, 2, 2),
            Err(OptError::JacobianDimMismatch { expected: (2, 2), found: (3, 2) })
        );
        jac[[2, 1]] = f64::INFINITY;
        assert!(matches!(
            validate_jacobian(&jac, 3, 2),
            Err(OptError::InvalidJacobian { row: 2, col: 1, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Verify parameter-vector checks for inputs and estimates.
    //
    // Given
    // -----
    // - Empty θ, θ with NaN, a missing θ̂ and a valid θ̂.
    //
    // Expect
    // ------
    // - Matching error variants and the valid vector returned unchanged.
    fn theta_checks_cover_missing_empty_and_non_finite() {
        // Arrange
        let empty: Theta = Array1::zeros(0);
        let nan = array![1.0, f64::NAN];
        let good = array![1.0, 2.0];

        // Act & Assert
        assert_eq!(validate_theta_input(&empty), Err(OptError::EmptyTheta));
        assert!(matches!(
            validate_theta_input(&nan),
            Err(OptError::InvalidThetaInput { index: 1, .. })
        ));
        assert_eq!(validate_theta_hat(None), Err(OptError::MissingThetaHat));
        assert!(matches!(
            validate_theta_hat(Some(nan.clone())),
            Err(OptError::InvalidThetaHat { index: 1, .. })
        ));
        assert_eq!(validate_theta_hat(Some(good.clone())), Ok(good));
    }
}
