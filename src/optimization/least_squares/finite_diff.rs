//! least_squares::finite_diff: central-difference Jacobians.
//!
//! Purpose
//! -------
//! Approximate the Jacobian of a vector-valued map `f: ℝᵖ → ℝⁿ` by central
//! differences with a fixed absolute step. The routine is generic over the
//! closure's error type so model layers can differentiate their own
//! fallible maps without routing through [`OptError`].
//!
//! Key behaviors
//! -------------
//! - [`central_jacobian`] perturbs one coordinate at a time by `±h` and
//!   stacks `(f(θ+h·eₖ) − f(θ−h·eₖ)) / 2h` as column `k`.
//! - Errors raised by the closure propagate unchanged.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every evaluation of `f` must return the same length; a mismatch is
//!   reported through the caller-supplied `on_mismatch` constructor.
//! - The step is absolute, not scaled by `|θₖ|`.
//!
//! Testing notes
//! -------------
//! - Unit tests compare against closed-form Jacobians of smooth maps and
//!   check error propagation.
use crate::optimization::least_squares::types::{JacobianMatrix, Theta};
use ndarray::{Array1, Array2};

/// central_jacobian: central finite-difference Jacobian of a vector map.
///
/// Parameters
/// ----------
/// - `theta`: `&Theta`
///   Point at which the Jacobian is approximated.
/// - `step`: `f64`
///   Absolute perturbation `h`.
/// - `f`: `FnMut(&Theta) -> Result<Array1<f64>, E>`
///   Map to differentiate.
/// - `on_mismatch`: `Fn(usize, usize) -> E`
///   Builds the error returned when an evaluation changes output length
///   (`expected`, `found`).
///
/// Returns
/// -------
/// `Result<JacobianMatrix, E>` with shape `n × p`.
///
/// Errors
/// ------
/// - Any error returned by `f`.
/// - The `on_mismatch` error if output lengths disagree.
pub fn central_jacobian<E, F, M>(
    theta: &Theta, step: f64, mut f: F, on_mismatch: M,
) -> Result<JacobianMatrix, E>
where
    F: FnMut(&Theta) -> Result<Array1<f64>, E>,
    M: Fn(usize, usize) -> E,
{
    let p = theta.len();
    let mut columns: Vec<Array1<f64>> = Vec::with_capacity(p);
    let mut n: Option<usize> = None;
    let mut probe = theta.clone();
    for k in 0..p {
        probe[k] = theta[k] + step;
        let plus = f(&probe)?;
        probe[k] = theta[k] - step;
        let minus = f(&probe)?;
        probe[k] = theta[k];

        let expected = *n.get_or_insert(plus.len());
        if plus.len() != expected {
            return Err(on_mismatch(expected, plus.len()));
        }
        if minus.len() != expected {
            return Err(on_mismatch(expected, minus.len()));
        }
        columns.push((plus - minus) / (2.0 * step));
    }

    let n = match n {
        Some(n) => n,
        None => f(theta)?.len(),
    };
    let mut jac = Array2::<f64>::zeros((n, p));
    for (k, col) in columns.into_iter().enumerate() {
        jac.column_mut(k).assign(&col);
    }
    Ok(jac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use ndarray::array;

    fn mismatch(expected: usize, found: usize) -> OptError {
        OptError::JacobianDimMismatch { expected: (expected, 0), found: (found, 0) }
    }

    #[test]
    // Purpose
    // -------
    // Check the central-difference Jacobian against an exact one.
    //
    // Given
    // -----
    // - f(a, b) = (a², a·b, sin b) at (1.5, 0.3), step 1e-6.
    //
    // Expect
    // ------
    // - Entries agree with [[2a, 0], [b, a], [0, cos b]] to ~1e-8.
    fn central_jacobian_matches_closed_form() {
        // Arrange
        let theta = array![1.5, 0.3];
        let f = |t: &Theta| -> Result<Array1<f64>, OptError> {
            Ok(array![t[0] * t[0], t[0] * t[1], t[1].sin()])
        };

        // Act
        let jac = central_jacobian(&theta, 1e-6, f, mismatch).unwrap();

        // Assert
        let exact = array![[3.0, 0.0], [0.3, 1.5], [0.0, 0.3f64.cos()]];
        assert_eq!(jac.dim(), (3, 2));
        for (a, b) in jac.iter().zip(exact.iter()) {
            assert!((a - b).abs() < 1e-8, "{a} vs {b}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure closure errors propagate instead of producing NaN columns.
    //
    // Given
    // -----
    // - A closure that fails whenever its first coordinate exceeds 1.
    //
    // Expect
    // ------
    // - The same error comes back from `central_jacobian`.
    fn central_jacobian_propagates_closure_errors() {
        // Arrange
        let theta = array![1.0];
        let f = |t: &Theta| -> Result<Array1<f64>, OptError> {
            if t[0] > 1.0 { Err(OptError::EmptyResiduals) } else { Ok(array![t[0]]) }
        };

        // Act
        let out = central_jacobian(&theta, 1e-6, f, mismatch);

        // Assert
        assert_eq!(out, Err(OptError::EmptyResiduals));
    }
}
