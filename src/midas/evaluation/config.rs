//! Evaluation run configuration.
//!
//! [`EvaluationConfig`] bundles everything one out-of-sample evaluation
//! needs: lag depths, publication horizon, reporting horizon, kernel,
//! window policy, optional date bounds and solver options. String-valued
//! choices parse through `FromStr` and fail with a configuration error
//! rather than falling back to a default.
use crate::{
    midas::{
        core::{
            kernels::WeightKernel,
            lags::LagSpec,
            options::{AlignSpec, MidasOptions},
        },
        errors::{MidasError, MidasResult},
    },
    optimization::least_squares::LsqOptions,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Window-management policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvaluationMethod {
    /// One estimation, forecasts for the whole remaining span.
    Fixed,
    /// Fixed-width window sliding one low-frequency step at a time.
    Rolling,
    /// Fixed start, end growing one step at a time.
    Recursive,
}

impl EvaluationMethod {
    pub fn name(&self) -> &'static str {
        match self {
            EvaluationMethod::Fixed => "fixed",
            EvaluationMethod::Rolling => "rolling",
            EvaluationMethod::Recursive => "recursive",
        }
    }
}

impl FromStr for EvaluationMethod {
    type Err = MidasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Ok(EvaluationMethod::Fixed),
            "rolling" => Ok(EvaluationMethod::Rolling),
            "recursive" | "expanding" => Ok(EvaluationMethod::Recursive),
            _ => Err(MidasError::UnknownMethod { name: s.to_string() }),
        }
    }
}

impl std::fmt::Display for EvaluationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration of one evaluation run.
///
/// - `horizon`: high-frequency periods between the last usable regressor
///   observation and the target date.
/// - `forecast_horizon`: low-frequency steps ahead reported by Rolling and
///   Recursive (≥ 1).
/// - `start_date` / `end_date`: bounds of the (first) estimation window.
/// - `window`: Rolling window length in low-frequency periods; defaults to
///   the length of the first estimation window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub xlag: LagSpec,
    pub ylag: LagSpec,
    pub horizon: usize,
    pub forecast_horizon: usize,
    pub kernel: WeightKernel,
    pub method: EvaluationMethod,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub window: Option<usize>,
    pub lsq: LsqOptions,
}

impl EvaluationConfig {
    /// Build a validated configuration without date bounds or window.
    ///
    /// # Errors
    /// - [`MidasError::InvalidForecastHorizon`] when `forecast_horizon == 0`.
    pub fn new(
        xlag: LagSpec, ylag: LagSpec, horizon: usize, forecast_horizon: usize,
        kernel: WeightKernel, method: EvaluationMethod,
    ) -> MidasResult<Self> {
        let config = Self {
            xlag,
            ylag,
            horizon,
            forecast_horizon,
            kernel,
            method,
            start_date: None,
            end_date: None,
            window: None,
            lsq: LsqOptions::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Build from string choices (`"3m"`, `"beta"`, `"rolling"`, …).
    ///
    /// # Errors
    /// - [`MidasError::InvalidLagString`], [`MidasError::UnknownKernel`],
    ///   [`MidasError::UnknownMethod`], or any error from [`Self::new`].
    pub fn from_names(
        xlag: &str, ylag: &str, horizon: usize, forecast_horizon: usize, poly: &str, method: &str,
    ) -> MidasResult<Self> {
        Self::new(
            xlag.parse()?,
            ylag.parse()?,
            horizon,
            forecast_horizon,
            poly.parse()?,
            method.parse()?,
        )
    }

    pub fn with_dates(self, start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        Self { start_date, end_date, ..self }
    }

    /// Set the Rolling window length.
    ///
    /// # Errors
    /// - [`MidasError::InvalidWindow`] for a zero-length window.
    pub fn with_window(self, window: usize) -> MidasResult<Self> {
        let config = Self { window: Some(window), ..self };
        config.validate()?;
        Ok(config)
    }

    pub fn with_lsq(self, lsq: LsqOptions) -> Self {
        Self { lsq, ..self }
    }

    /// Check invariants that the builders cannot express in types.
    ///
    /// # Errors
    /// - [`MidasError::InvalidForecastHorizon`], [`MidasError::InvalidWindow`].
    pub fn validate(&self) -> MidasResult<()> {
        if self.forecast_horizon == 0 {
            return Err(MidasError::InvalidForecastHorizon {
                forecast_horizon: self.forecast_horizon,
            });
        }
        if self.window == Some(0) {
            return Err(MidasError::InvalidWindow {
                window: 0,
                reason: "window must cover at least one period",
            });
        }
        Ok(())
    }

    /// Alignment request for the configured (first) estimation window.
    pub fn align_spec(&self) -> AlignSpec {
        AlignSpec::new(self.xlag, self.ylag, self.horizon)
            .with_dates(self.start_date, self.end_date)
    }

    pub fn model_options(&self) -> MidasOptions {
        MidasOptions { kernel: self.kernel, lsq: self.lsq }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // String configuration parses every field and rejects unknown choices.
    //
    // Given
    // -----
    // - ("3m", "1", beta, rolling) plus unknown method and kernel names.
    //
    // Expect
    // ------
    // - Parsed fields; `UnknownMethod` and `UnknownKernel` errors.
    fn from_names_parses_and_rejects() {
        // Act
        let config = EvaluationConfig::from_names("3m", "1", 1, 1, "beta", "Rolling").unwrap();

        // Assert
        assert_eq!(config.xlag.to_string(), "3m");
        assert_eq!(config.ylag, LagSpec::Count(1));
        assert_eq!(config.kernel, WeightKernel::Beta { shift: false });
        assert_eq!(config.method, EvaluationMethod::Rolling);
        assert!(matches!(
            EvaluationConfig::from_names("3", "1", 1, 1, "beta", "walkforward"),
            Err(MidasError::UnknownMethod { .. })
        ));
        assert!(matches!(
            EvaluationConfig::from_names("3", "1", 1, 1, "almon", "fixed"),
            Err(MidasError::UnknownKernel { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Horizon and window guards.
    //
    // Given
    // -----
    // - forecast_horizon 0, then a valid config with window 0.
    //
    // Expect
    // ------
    // - `InvalidForecastHorizon`, `InvalidWindow`.
    fn invalid_horizon_and_window_are_rejected() {
        // Act & Assert
        assert_eq!(
            EvaluationConfig::from_names("3", "1", 1, 0, "beta", "fixed"),
            Err(MidasError::InvalidForecastHorizon { forecast_horizon: 0 })
        );
        let config = EvaluationConfig::from_names("3", "1", 1, 1, "beta", "rolling").unwrap();
        assert!(matches!(config.with_window(0), Err(MidasError::InvalidWindow { .. })));
        assert_eq!(config.with_window(12).map(|c| c.window), Ok(Some(12)));
    }
}
