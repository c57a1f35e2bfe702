//! evaluation: out-of-sample forecast evaluation.
//!
//! Purpose
//! -------
//! Repeatedly align, fit and forecast under a Fixed, Rolling or Recursive
//! window policy, and summarize the forecasts by RMSE.
//!
//! Key behaviors
//! -------------
//! - [`EvaluationConfig`] carries lag depths, horizons, kernel, window
//!   policy and solver options; string choices parse through `FromStr`.
//! - [`evaluate`] runs the protocol and returns an [`EvaluationReport`].
//! - [`rmse`] is a pure function over paired predictions and realizations.
//!
//! Conventions
//! -----------
//! - Step progress is logged at `debug!`, early stops at `debug!`/`warn!`,
//!   and a summary at `info!` via `tracing`.

pub mod config;
pub mod metrics;
pub mod protocol;
pub mod records;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::config::{EvaluationConfig, EvaluationMethod};
pub use self::metrics::rmse;
pub use self::protocol::evaluate;
pub use self::records::{EvaluationReport, ForecastRecord};
