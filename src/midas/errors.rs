//! Errors for MIDAS regression (configuration parsing, series validation,
//! mixed-frequency alignment, estimation, and evaluation).
//!
//! This module defines [`MidasError`], used across the Rust core and the
//! optional Python bindings. It implements `Display`/`Error` and, with the
//! `python-bindings` feature, converts to `PyErr` (`ValueError`).
//!
//! ## Conventions
//! - **Indices are 0-based**.
//! - Configuration mistakes fail at call time and are never defaulted away.
//! - Optimizer failures are wrapped unchanged in [`MidasError::Optimizer`];
//!   inference failures in [`MidasError::Inference`]. Non-convergence is not
//!   an error and never appears here.
use crate::{
    inference::errors::InferenceError,
    midas::core::{frequency::Frequency, lags::LagUnit},
    optimization::errors::OptError,
};
use chrono::NaiveDate;

/// Crate-wide result alias for MIDAS operations.
pub type MidasResult<T> = Result<T, MidasError>;

/// Unified error type for MIDAS modeling.
#[derive(Debug, Clone, PartialEq)]
pub enum MidasError {
    // ---- Configuration ----
    /// Kernel name is not one of the supported weighting schemes.
    UnknownKernel { name: String },

    /// Evaluation method is not `fixed`, `rolling` or `recursive`.
    UnknownMethod { name: String },

    /// Frequency code could not be parsed.
    UnknownFrequency { code: String },

    /// Lag string is not `<count>` or `<count><unit>`.
    InvalidLagString { spec: String, reason: &'static str },

    /// Duration unit has no conversion for the series frequency.
    UnmappedLagUnit { unit: LagUnit, frequency: Frequency },

    /// Resolved high-frequency lag count must be positive.
    ZeroLags,

    /// Forecast horizon (steps ahead) must be positive.
    InvalidForecastHorizon { forecast_horizon: usize },

    /// Rolling window length is unusable.
    InvalidWindow { window: usize, reason: &'static str },

    /// Kernel parameter vector has the wrong length.
    KernelParamLength { kernel: &'static str, expected: usize, actual: usize },

    // ---- Series validation ----
    /// Series is empty.
    EmptySeries,

    /// Dates and values differ in length.
    SeriesLengthMismatch { dates: usize, values: usize },

    /// Two observations share a timestamp.
    DuplicateTimestamp { date: NaiveDate },

    /// A value is NaN/±inf.
    NonFiniteValue { index: usize, value: f64 },

    /// Sampling frequency cannot be inferred from the spacing.
    CannotInferFrequency { median_days: i64 },

    /// A date string could not be parsed.
    InvalidDate { input: String },

    // ---- Alignment ----
    /// No feasible estimation span exists.
    InfeasibleAlignment { reason: String },

    /// No high-frequency observation at or before the target date.
    NoAsOfObservation { date: NaiveDate },

    /// Not enough high-frequency history for the requested lags.
    InsufficientHistory { date: NaiveDate, needed: usize, available: usize },

    /// Two arrays that must agree in shape do not.
    DimensionMismatch { what: &'static str, expected: usize, found: usize },

    // ---- Estimation / evaluation ----
    /// Optimizer or linear-algebra failure.
    Optimizer(OptError),

    /// Standard-error computation failed.
    Inference(InferenceError),
}

impl std::error::Error for MidasError {}

impl std::fmt::Display for MidasError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            MidasError::UnknownKernel { name } => write!(
                f,
                "Unknown weighting kernel '{name}': expected 'beta', 'beta_shift', 'expalmon' or 'unrestricted'."
            ),
            MidasError::UnknownMethod { name } => write!(
                f,
                "Unknown evaluation method '{name}': expected 'fixed', 'rolling' or 'recursive'."
            ),
            MidasError::UnknownFrequency { code } => {
                write!(f, "Unknown frequency code '{code}': expected one of D, B, W, M, Q, A.")
            }
            MidasError::InvalidLagString { spec, reason } => {
                write!(f, "Invalid lag specification '{spec}': {reason}")
            }
            MidasError::UnmappedLagUnit { unit, frequency } => {
                write!(f, "Lag unit '{unit}' cannot be resolved against a {frequency} series.")
            }
            MidasError::ZeroLags => {
                write!(f, "High-frequency lag count must be at least one.")
            }
            MidasError::InvalidForecastHorizon { forecast_horizon } => {
                write!(f, "Forecast horizon must be at least one step, got {forecast_horizon}.")
            }
            MidasError::InvalidWindow { window, reason } => {
                write!(f, "Invalid estimation window {window}: {reason}")
            }
            MidasError::KernelParamLength { kernel, expected, actual } => {
                write!(f, "{kernel} kernel expects {expected} parameters, got {actual}.")
            }

            // ---- Series validation ----
            MidasError::EmptySeries => write!(f, "Series is empty."),
            MidasError::SeriesLengthMismatch { dates, values } => {
                write!(f, "Series has {dates} dates but {values} values.")
            }
            MidasError::DuplicateTimestamp { date } => {
                write!(f, "Duplicate timestamp {date} in series.")
            }
            MidasError::NonFiniteValue { index, value } => {
                write!(f, "Non-finite value at index {index}: {value}")
            }
            MidasError::CannotInferFrequency { median_days } => write!(
                f,
                "Cannot infer sampling frequency from a median spacing of {median_days} days."
            ),
            MidasError::InvalidDate { input } => {
                write!(f, "Invalid date '{input}': expected YYYY-MM-DD.")
            }

            // ---- Alignment ----
            MidasError::InfeasibleAlignment { reason } => {
                write!(f, "Infeasible alignment: {reason}")
            }
            MidasError::NoAsOfObservation { date } => {
                write!(f, "No high-frequency observation at or before {date}.")
            }
            MidasError::InsufficientHistory { date, needed, available } => write!(
                f,
                "Target {date} needs {needed} high-frequency observations but only {available} precede it."
            ),
            MidasError::DimensionMismatch { what, expected, found } => {
                write!(f, "Dimension mismatch for {what}: expected {expected}, found {found}.")
            }

            // ---- Estimation / evaluation ----
            MidasError::Optimizer(err) => write!(f, "Optimizer error: {err}"),
            MidasError::Inference(err) => write!(f, "Inference error: {err}"),
        }
    }
}

impl From<OptError> for MidasError {
    fn from(err: OptError) -> MidasError {
        MidasError::Optimizer(err)
    }
}

impl From<InferenceError> for MidasError {
    fn from(err: InferenceError) -> MidasError {
        MidasError::Inference(err)
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<MidasError> for pyo3::PyErr {
    fn from(err: MidasError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
