//! rust_midas: mixed-data-sampling (MIDAS) regression with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes MIDAS estimation and out-of-sample evaluation to Python via the
//! `_rust_midas` extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`midas`, `inference`, `optimization`)
//!   as the public crate surface.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for the
//!   `_rust_midas` Python extension, with a `midas` submodule importable as
//!   `rust_midas.midas`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work happens in the inner Rust modules; this file performs
//!   only FFI glue, input conversion, and error mapping.
//! - Dates cross the FFI boundary as ISO `YYYY-MM-DD` strings.
//!
//! Conventions
//! -----------
//! - Errors from core Rust code are propagated as [`MidasError`] internally
//!   and converted to `ValueError` at the PyO3 boundary.
//! - Logging goes through `tracing`; installing a subscriber is left to the
//!   host application.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules
//!   and by `tests/integration_midas_pipeline.rs`.
//!
//! [`MidasError`]: crate::midas::errors::MidasError

pub mod inference;
pub mod midas;
pub mod optimization;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    midas::{
        core::{
            align::align,
            aligned::AlignedWindow,
            options::{AlignSpec, MidasOptions},
        },
        evaluation::{EvaluationConfig, EvaluationReport, evaluate},
        models::{FitResult, MidasModel},
    },
    utils::{extract_date, extract_hac_options, extract_lsq_options, extract_series},
};

/// MidasFit: Python-facing wrapper for one aligned MIDAS estimation.
///
/// Purpose
/// -------
/// Align a low/high-frequency pair, fit the regression on the estimation
/// window, and keep the forecast window for out-of-sample predictions.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `MidasFit(low_dates, low_values, high_dates, high_values, xlag="3",
/// ylag="1", horizon=1, poly="beta", start=None, end=None, max_nfev=None)`:
/// - `*_dates`: ISO date strings; `*_values`: 1-D float64 array-likes.
/// - `xlag`, `ylag`: lag counts or duration strings (`"3m"`, `"1q"`).
/// - `poly`: `beta`, `beta_shift`, `expalmon` or `unrestricted`.
///
/// Notes
/// -----
/// - Rust callers should use [`align`] and [`MidasModel`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_midas.midas")]
pub struct MidasFit {
    model: MidasModel,
    aligned: AlignedWindow,
    inner: FitResult,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl MidasFit {
    #[new]
    #[pyo3(
        signature = (
            low_dates,
            low_values,
            high_dates,
            high_values,
            xlag = "3",
            ylag = "1",
            horizon = 1,
            poly = "beta",
            start = None,
            end = None,
            max_nfev = None,
        ),
        text_signature = "(low_dates, low_values, high_dates, high_values, /, xlag='3', \
                          ylag='1', horizon=1, poly='beta', start=None, end=None, \
                          max_nfev=None)"
    )]
    pub fn new<'py>(
        py: Python<'py>, low_dates: Vec<String>, low_values: &Bound<'py, PyAny>,
        high_dates: Vec<String>, high_values: &Bound<'py, PyAny>, xlag: &str, ylag: &str,
        horizon: usize, poly: &str, start: Option<&str>, end: Option<&str>,
        max_nfev: Option<usize>,
    ) -> PyResult<Self> {
        let low = extract_series(py, low_dates, low_values)?;
        let high = extract_series(py, high_dates, high_values)?;
        let spec = AlignSpec::new(xlag.parse()?, ylag.parse()?, horizon)
            .with_dates(extract_date(start)?, extract_date(end)?);
        let options = MidasOptions::from_kernel_name(poly, extract_lsq_options(max_nfev, None)?)?;

        let aligned = align(&low, &high, &spec)?;
        let model = MidasModel::new(options);
        let inner = model.fit(&aligned.estimation)?;
        Ok(MidasFit { model, aligned, inner })
    }

    /// Point forecasts for the forecast window.
    pub fn forecast(&self) -> PyResult<Vec<f64>> {
        Ok(self.model.predict(&self.inner, &self.aligned.forecast)?.to_vec())
    }

    /// `(std_errors, t_stats, p_values)`; `robust=True` uses a HAC sandwich.
    #[pyo3(
        signature = (robust = false, kernel = None, bandwidth = None, center = None,
                     small_sample_correction = None)
    )]
    pub fn standard_errors(
        &self, robust: bool, kernel: Option<&str>, bandwidth: Option<usize>,
        center: Option<bool>, small_sample_correction: Option<bool>,
    ) -> PyResult<(Vec<f64>, Vec<f64>, Vec<f64>)> {
        let hac = if robust {
            Some(extract_hac_options(kernel, bandwidth, center, small_sample_correction)?)
        } else {
            None
        };
        let inference =
            self.model.standard_errors(&self.aligned.estimation, &self.inner, hac.as_ref())?;
        Ok((inference.std_errors.to_vec(), inference.t_stats.to_vec(), inference.p_values.to_vec()))
    }

    #[getter]
    pub fn theta(&self) -> Vec<f64> {
        self.inner.theta.to_vec()
    }

    #[getter]
    pub fn intercept(&self) -> f64 {
        self.inner.intercept()
    }

    #[getter]
    pub fn slope(&self) -> f64 {
        self.inner.slope()
    }

    #[getter]
    pub fn kernel_params(&self) -> Vec<f64> {
        self.inner.kernel_params().to_vec()
    }

    #[getter]
    pub fn ar_coefficients(&self) -> Vec<f64> {
        self.inner.ar_coefficients().to_vec()
    }

    #[getter]
    pub fn weights(&self) -> PyResult<Vec<f64>> {
        Ok(self.inner.weights()?.to_vec())
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged()
    }

    #[getter]
    pub fn status(&self) -> String {
        self.inner.diagnostics.status.clone()
    }

    #[getter]
    pub fn in_sample_rmse(&self) -> f64 {
        self.inner.in_sample_rmse
    }

    #[getter]
    pub fn estimation_dates(&self) -> Vec<String> {
        self.aligned.estimation.dates.iter().map(|d| d.to_string()).collect()
    }

    #[getter]
    pub fn forecast_dates(&self) -> Vec<String> {
        self.aligned.forecast.dates.iter().map(|d| d.to_string()).collect()
    }
}

/// MidasEvaluation: Python-facing wrapper for an out-of-sample evaluation.
///
/// Constructed from Python via
/// `MidasEvaluation(low_dates, low_values, high_dates, high_values,
/// xlag="3", ylag="1", horizon=1, forecast_horizon=1, poly="beta",
/// method="fixed", start=None, end=None, window=None, max_nfev=None)`;
/// the evaluation runs eagerly and the report is exposed through getters.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_midas.midas")]
pub struct MidasEvaluation {
    inner: EvaluationReport,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl MidasEvaluation {
    #[new]
    #[pyo3(
        signature = (
            low_dates,
            low_values,
            high_dates,
            high_values,
            xlag = "3",
            ylag = "1",
            horizon = 1,
            forecast_horizon = 1,
            poly = "beta",
            method = "fixed",
            start = None,
            end = None,
            window = None,
            max_nfev = None,
        ),
        text_signature = "(low_dates, low_values, high_dates, high_values, /, xlag='3', \
                          ylag='1', horizon=1, forecast_horizon=1, poly='beta', \
                          method='fixed', start=None, end=None, window=None, max_nfev=None)"
    )]
    pub fn new<'py>(
        py: Python<'py>, low_dates: Vec<String>, low_values: &Bound<'py, PyAny>,
        high_dates: Vec<String>, high_values: &Bound<'py, PyAny>, xlag: &str, ylag: &str,
        horizon: usize, forecast_horizon: usize, poly: &str, method: &str, start: Option<&str>,
        end: Option<&str>, window: Option<usize>, max_nfev: Option<usize>,
    ) -> PyResult<Self> {
        let low = extract_series(py, low_dates, low_values)?;
        let high = extract_series(py, high_dates, high_values)?;
        let mut config =
            EvaluationConfig::from_names(xlag, ylag, horizon, forecast_horizon, poly, method)?
                .with_dates(extract_date(start)?, extract_date(end)?)
                .with_lsq(extract_lsq_options(max_nfev, None)?);
        if let Some(w) = window {
            config = config.with_window(w)?;
        }
        let inner = evaluate(&low, &high, &config)?;
        Ok(MidasEvaluation { inner })
    }

    #[getter]
    pub fn method(&self) -> String {
        self.inner.method.to_string()
    }

    #[getter]
    pub fn rmse(&self) -> Option<f64> {
        self.inner.rmse
    }

    #[getter]
    pub fn dates(&self) -> Vec<String> {
        self.inner.dates().iter().map(|d| d.to_string()).collect()
    }

    #[getter]
    pub fn predictions(&self) -> Vec<f64> {
        self.inner.predictions()
    }

    #[getter]
    pub fn actuals(&self) -> Vec<f64> {
        self.inner.actuals()
    }

    #[getter]
    pub fn fits(&self) -> usize {
        self.inner.fits
    }

    #[getter]
    pub fn non_converged(&self) -> usize {
        self.inner.non_converged
    }
}

/// _rust_midas: PyO3 module initializer for the Python extension.
///
/// Creates the `midas` submodule, attaches it to `_rust_midas`, and registers
/// it in `sys.modules` so `rust_midas.midas` imports with dot notation.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_midas<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let midas_mod = PyModule::new(_py, "midas")?;
    midas_models(_py, m, &midas_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("rust_midas.midas", midas_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn midas_models<'py>(
    _py: Python, rust_midas: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<MidasFit>()?;
    m.add_class::<MidasEvaluation>()?;
    rust_midas.add_submodule(m)?;
    Ok(())
}
