//! Execution helper that runs the Levenberg–Marquardt solver on a residual
//! problem and returns a crate-friendly [`LsqOutcome`].
use crate::optimization::{
    errors::OptResult,
    least_squares::{
        LsqOptions, LsqOutcome, ResidualModel, Theta, adapter::LsqAdapter,
        solver::LevenbergMarquardt,
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::Operator;
use argmin::core::{Executor, State};

/// Run Levenberg–Marquardt for a residual problem.
///
/// Wires up:
/// - the user model via [`LsqAdapter`],
/// - a [`LevenbergMarquardt`] solver built from `opts`,
/// - the initial parameter `theta0`,
/// - optional observers (behind the `obs_slog` feature),
/// - an iteration cap equal to `opts.tols.max_nfev` as a backstop,
///   then executes the solver and converts the result into [`LsqOutcome`].
///
/// # Feature flags
/// If the `obs_slog` feature is enabled and `opts.verbose == true`, a terminal
/// slog observer is attached with `ObserverMode::Always` and a one-time
/// pre-iteration line logs c(θ₀).
///
/// # Errors
/// - Propagates any `argmin` runtime error (observer failures, residual or
///   Jacobian errors raised by the model) via `From<argmin::core::Error>`.
/// - Propagates validation errors encountered when constructing
///   [`LsqOutcome`].
pub fn run_lm<'a, F>(
    theta0: Theta, opts: &LsqOptions, problem: LsqAdapter<'a, F>,
) -> OptResult<LsqOutcome>
where
    F: ResidualModel,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let solver = LevenbergMarquardt::new(opts.tols, opts.initial_damping);
    let max_iters = opts.tols.max_nfev as u64;
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0).max_iters(max_iters));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    LsqOutcome::new(
        result.take_best_param(),
        result.get_best_cost(),
        termination,
        iterations,
        function_counts,
    )
}

// ---- Helper Methods ----

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(theta0: &Theta, problem: &LsqAdapter<'_, F>) -> OptResult<()>
where
    F: ResidualModel,
{
    let r0 = problem.apply(theta0)?;
    let c0 = crate::optimization::least_squares::solver::half_sq_norm(&r0);
    eprintln!("init: cost(theta0) = {:.6}, n_residuals = {}", c0, r0.len());
    Ok(())
}
