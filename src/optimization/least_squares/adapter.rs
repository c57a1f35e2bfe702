//! Adapter that exposes a user `ResidualModel` as an `argmin` problem.
//!
//! The residual map is exposed through `Operator` and its Jacobian through
//! `Jacobian`. If the model does not provide an analytic Jacobian we
//! central-difference the residual map with [`FD_STEP`].
use crate::optimization::{
    errors::OptError,
    least_squares::{
        finite_diff::central_jacobian,
        traits::ResidualModel,
        types::{FD_STEP, JacobianMatrix, Residuals, Theta},
        validation::validate_jacobian,
    },
};
use argmin::core::{Error, Jacobian, Operator};

/// Bridges a user `ResidualModel` to `argmin`'s `Operator` and `Jacobian`.
///
/// - `Operator::apply` returns `r(θ)`. Only emptiness is rejected here;
///   non-finite residuals at trial points are left for the solver to reject.
/// - `Jacobian::jacobian` returns the analytic `∂r/∂θ` when available,
///   otherwise a central-difference approximation. Both paths are validated.
#[derive(Debug, Clone)]
pub struct LsqAdapter<'a, F: ResidualModel> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: ResidualModel> LsqAdapter<'a, F> {
    /// Construct a new adapter over a user `ResidualModel` and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }

    fn residuals(&self, theta: &Theta) -> Result<Residuals, OptError> {
        let r = self.f.residuals(theta, self.data)?;
        if r.is_empty() {
            return Err(OptError::EmptyResiduals);
        }
        Ok(r)
    }
}

impl<'a, F: ResidualModel> Operator for LsqAdapter<'a, F> {
    type Param = Theta;
    type Output = Residuals;

    /// Evaluate the residual vector `r(θ)`.
    ///
    /// # Errors
    /// Propagates any `OptError` from the user's `residuals` via `?`.
    fn apply(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.residuals(theta)?)
    }
}

impl<'a, F: ResidualModel> Jacobian for LsqAdapter<'a, F> {
    type Param = Theta;
    type Jacobian = JacobianMatrix;

    /// Evaluate `∂r/∂θ` at `θ`.
    ///
    /// Behavior:
    /// - If the user implements `jacobian(θ, data)`, we validate and return it.
    /// - On `JacobianNotImplemented`, we central-difference the residual map.
    ///
    /// # Errors
    /// - Propagates user errors from `jacobian` (other than
    ///   `JacobianNotImplemented`) and from residual evaluations during FD.
    /// - Returns validation errors for wrong shapes or non-finite entries.
    fn jacobian(&self, theta: &Self::Param) -> Result<Self::Jacobian, Error> {
        let cols = theta.len();
        let jac = match self.f.jacobian(theta, self.data) {
            Ok(jac) => jac,
            Err(OptError::JacobianNotImplemented) => central_jacobian(
                theta,
                FD_STEP,
                |t: &Theta| self.residuals(t),
                |expected, found| OptError::JacobianDimMismatch {
                    expected: (expected, cols),
                    found: (found, cols),
                },
            )?,
            Err(e) => return Err(e.into()),
        };
        let rows = self.residuals(theta)?.len();
        validate_jacobian(&jac, rows, cols)?;
        Ok(jac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use ndarray::{Array1, array};

    /// Linear residuals r(θ) = A·θ − b with no analytic Jacobian.
    struct Linear;

    impl ResidualModel for Linear {
        type Data = (ndarray::Array2<f64>, Array1<f64>);

        fn residuals(&self, theta: &Theta, data: &Self::Data) -> OptResult<Residuals> {
            Ok(data.0.dot(theta) - &data.1)
        }

        fn check(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<()> {
            Ok(())
        }
    }

    /// Same model but reporting a wrongly shaped analytic Jacobian.
    struct BadJacobian;

    impl ResidualModel for BadJacobian {
        type Data = ();

        fn residuals(&self, theta: &Theta, _data: &()) -> OptResult<Residuals> {
            Ok(theta.clone())
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptResult<()> {
            Ok(())
        }

        fn jacobian(&self, _theta: &Theta, _data: &()) -> OptResult<JacobianMatrix> {
            Ok(ndarray::Array2::zeros((1, 1)))
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify the finite-difference fallback recovers the exact Jacobian of a
    // linear residual map.
    //
    // Given
    // -----
    // - r(θ) = A·θ − b with a 3×2 matrix A.
    //
    // Expect
    // ------
    // - The adapter Jacobian equals A up to FD rounding.
    fn fd_fallback_recovers_linear_jacobian() {
        // Arrange
        let a = array![[1.0, 2.0], [0.5, -1.0], [3.0, 0.0]];
        let data = (a.clone(), array![1.0, 2.0, 3.0]);
        let model = Linear;
        let adapter = LsqAdapter::new(&model, &data);

        // Act
        let jac = adapter.jacobian(&array![0.2, -0.4]).unwrap();

        // Assert
        for (x, y) in jac.iter().zip(a.iter()) {
            assert!((x - y).abs() < 1e-8);
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure analytic Jacobians with the wrong shape are rejected.
    //
    // Given
    // -----
    // - A model returning a 1×1 Jacobian for a 2-parameter, 2-residual map.
    //
    // Expect
    // ------
    // - The error converts back into `OptError::JacobianDimMismatch`.
    fn analytic_jacobian_shape_is_validated() {
        // Arrange
        let model = BadJacobian;
        let adapter = LsqAdapter::new(&model, &());

        // Act
        let err = adapter.jacobian(&array![1.0, 2.0]).unwrap_err();

        // Assert
        assert_eq!(
            OptError::from(err),
            OptError::JacobianDimMismatch { expected: (2, 2), found: (1, 1) }
        );
    }
}
