//! Configuration types for alignment and estimation.
//!
//! - [`AlignSpec`]: lag depths, publication horizon and optional date bounds
//!   consumed by the aligner.
//! - [`MidasOptions`]: kernel choice plus solver options for the estimator.
//!
//! Both are plain data with validating constructors; `Default` gives the
//! documented defaults.
use crate::{
    midas::{
        core::{kernels::WeightKernel, lags::LagSpec},
        errors::MidasResult,
    },
    optimization::least_squares::LsqOptions,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Alignment request.
///
/// - `xlag`: high-frequency lag depth, resolved against the regressor's
///   frequency.
/// - `ylag`: autoregressive lag depth, resolved against the target's
///   frequency (`0` disables AR terms).
/// - `horizon`: high-frequency periods between the last usable regressor
///   observation and the as-of point of the target date.
/// - `start_date` / `end_date`: optional bounds of the estimation span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignSpec {
    pub xlag: LagSpec,
    pub ylag: LagSpec,
    pub horizon: usize,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl AlignSpec {
    pub fn new(xlag: LagSpec, ylag: LagSpec, horizon: usize) -> Self {
        Self { xlag, ylag, horizon, start_date: None, end_date: None }
    }

    /// Same spec with explicit estimation bounds.
    pub fn with_dates(self, start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        Self { start_date, end_date, ..self }
    }
}

/// Estimator configuration.
///
/// Default: Beta kernel without shift and [`LsqOptions::default`]
/// (step/cost tolerance 1e-9, at most 5000 residual evaluations).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MidasOptions {
    pub kernel: WeightKernel,
    pub lsq: LsqOptions,
}

impl MidasOptions {
    /// Build options from a kernel name.
    ///
    /// # Errors
    /// - [`MidasError::UnknownKernel`](crate::midas::errors::MidasError::UnknownKernel).
    pub fn from_kernel_name(name: &str, lsq: LsqOptions) -> MidasResult<Self> {
        Ok(Self { kernel: name.parse()?, lsq })
    }
}

impl Default for MidasOptions {
    fn default() -> Self {
        Self { kernel: WeightKernel::Beta { shift: false }, lsq: LsqOptions::default() }
    }
}
