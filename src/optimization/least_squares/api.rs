//! High-level entry point for minimizing `½‖r(θ)‖²` over a user-provided
//! `ResidualModel`.
use crate::optimization::{
    errors::OptResult,
    least_squares::{
        LsqOutcome, Theta,
        adapter::LsqAdapter,
        run::run_lm,
        traits::{LsqOptions, ResidualModel},
        validation::validate_theta_input,
    },
};

/// Solve a nonlinear least-squares problem with Levenberg–Marquardt.
///
/// # Behavior
/// - Validates `theta0` (non-empty, finite) and calls `f.check(theta0, data)`.
/// - Wraps `(f, data)` in an `LsqAdapter` exposing residuals and Jacobian to
///   `argmin`.
/// - Calls `run_lm`, which configures the executor and returns an
///   `LsqOutcome`.
///
/// # Errors
/// - [`OptError::EmptyTheta`](crate::optimization::errors::OptError::EmptyTheta)
///   or `InvalidThetaInput` for a bad starting vector.
/// - Propagates any error from `f.check`, from residual/Jacobian evaluation,
///   or from outcome validation.
///
/// Non-convergence is **not** an error: inspect `LsqOutcome::converged`.
///
/// # Example
/// ```
/// use ndarray::{Array1, array};
/// use rust_midas::optimization::errors::OptResult;
/// use rust_midas::optimization::least_squares::{
///     least_squares, LsqOptions, ResidualModel, Theta,
/// };
///
/// struct Line;
/// impl ResidualModel for Line {
///     type Data = (Array1<f64>, Array1<f64>);
///     fn residuals(&self, t: &Theta, d: &Self::Data) -> OptResult<Array1<f64>> {
///         Ok(&d.1 - &(d.0.mapv(|x| t[0] + t[1] * x)))
///     }
///     fn check(&self, _: &Theta, _: &Self::Data) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let data = (array![0.0, 1.0, 2.0], array![1.0, 3.0, 5.0]);
/// let out = least_squares(&Line, array![0.0, 0.0], &data, &LsqOptions::default())?;
/// assert!((out.theta_hat[1] - 2.0).abs() < 1e-6);
/// # Ok::<(), rust_midas::optimization::errors::OptError>(())
/// ```
pub fn least_squares<F: ResidualModel>(
    f: &F, theta0: Theta, data: &F::Data, opts: &LsqOptions,
) -> OptResult<LsqOutcome> {
    validate_theta_input(&theta0)?;
    f.check(&theta0, data)?;
    let problem = LsqAdapter::new(f, data);
    run_lm(theta0, opts, problem)
}
