//! midas: mixed-data-sampling regression.
//!
//! Purpose
//! -------
//! Regress a low-frequency target on a weighted sum of high-frequency lags
//! (plus optional autoregressive lags of the target) and evaluate the model
//! out of sample.
//!
//! Layout
//! ------
//! - [`core`]: series, frequencies, lag specifications, weight kernels and
//!   the mixed-frequency aligner.
//! - [`models`]: estimation, forecasting and standard errors.
//! - [`evaluation`]: Fixed / Rolling / Recursive protocols and RMSE.
//! - [`errors`]: the unified [`MidasError`](errors::MidasError).
//!
//! Downstream usage
//! ----------------
//! ```rust,no_run
//! use rust_midas::midas::prelude::*;
//! # fn run(low: TimeSeries, high: TimeSeries) -> MidasResult<()> {
//! let config = EvaluationConfig::from_names("3m", "1", 1, 1, "beta", "rolling")?;
//! let report = evaluate(&low, &high, &config)?;
//! if let Some(rmse) = report.rmse {
//!     println!("RMSE {rmse:.4} over {} forecasts", report.records.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod errors;
pub mod evaluation;
pub mod models;

pub mod prelude {
    pub use super::core::{
        AlignSpec, AlignedWindow, Frequency, LagSpec, MidasOptions, TimeSeries, WeightKernel,
        WindowSlice, align,
    };
    pub use super::errors::{MidasError, MidasResult};
    pub use super::evaluation::{
        EvaluationConfig, EvaluationMethod, EvaluationReport, ForecastRecord, evaluate, rmse,
    };
    pub use super::models::{FitResult, MidasModel, predict};
}
