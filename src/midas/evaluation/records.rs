//! Forecast records and evaluation reports.
//!
//! Both types are plain serde data so an external collaborator can persist
//! them (JSON, CSV, spreadsheets) without touching the estimator.
use crate::midas::{
    errors::MidasResult,
    evaluation::{config::EvaluationMethod, metrics::rmse},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One out-of-sample point forecast and its realization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub date: NaiveDate,
    pub prediction: f64,
    pub actual: f64,
}

impl ForecastRecord {
    /// Forecast error `actual − prediction`.
    pub fn error(&self) -> f64 {
        self.actual - self.prediction
    }
}

/// Outcome of one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub method: EvaluationMethod,
    pub forecast_horizon: usize,
    pub records: Vec<ForecastRecord>,
    /// `None` when the run stopped before producing a record.
    pub rmse: Option<f64>,
    /// Number of estimations performed.
    pub fits: usize,
    /// How many of those ended without solver convergence.
    pub non_converged: usize,
}

impl EvaluationReport {
    /// Assemble a report and compute its RMSE over `records`.
    ///
    /// An empty `records` list is a valid outcome (the data ran out before
    /// the first full forecast horizon) and leaves `rmse` undefined.
    pub fn new(
        method: EvaluationMethod, forecast_horizon: usize, records: Vec<ForecastRecord>,
        fits: usize, non_converged: usize,
    ) -> MidasResult<Self> {
        let rmse = if records.is_empty() {
            None
        } else {
            let predictions: Vec<f64> = records.iter().map(|r| r.prediction).collect();
            let actuals: Vec<f64> = records.iter().map(|r| r.actual).collect();
            Some(rmse(&predictions, &actuals)?)
        };
        Ok(Self { method, forecast_horizon, records, rmse, fits, non_converged })
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.records.iter().map(|r| r.date).collect()
    }

    pub fn predictions(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.prediction).collect()
    }

    pub fn actuals(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.actual).collect()
    }
}
