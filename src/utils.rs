//! utils: input conversion shared by the crate root and the Python layer.
//!
//! Date strings are parsed here for every caller; the remaining helpers
//! exist only with the `python-bindings` feature and turn Python objects
//! into validated Rust configuration.
use crate::midas::errors::{MidasError, MidasResult};
use chrono::NaiveDate;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    inference::{hac::HACOptions, kernel::KernelType},
    midas::core::series::TimeSeries,
    optimization::least_squares::{LsqOptions, Tolerances},
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

/// Parse an ISO `YYYY-MM-DD` date; a trailing time component
/// (`YYYY-MM-DDTHH:MM:SS` or with a space) is ignored.
///
/// # Errors
/// - [`MidasError::InvalidDate`] for anything else.
pub fn parse_date(input: &str) -> MidasResult<NaiveDate> {
    let trimmed = input.trim();
    let day = trimmed.split(['T', ' ']).next().unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|_| MidasError::InvalidDate { input: input.to_string() })
}

/// Parse a list of ISO dates, failing on the first invalid entry.
pub fn parse_dates<S: AsRef<str>>(inputs: &[S]) -> MidasResult<Vec<NaiveDate>> {
    inputs.iter().map(|s| parse_date(s.as_ref())).collect()
}

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Build a [`TimeSeries`] from ISO date strings and an array-like of values.
#[cfg(feature = "python-bindings")]
pub fn extract_series<'py>(
    py: Python<'py>, dates: Vec<String>, values: &Bound<'py, PyAny>,
) -> PyResult<TimeSeries> {
    let arr = extract_f64_array(py, values)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err("values must be a 1-D contiguous float64 array or sequence")
    })?;
    let parsed = parse_dates(&dates)?;
    Ok(TimeSeries::new(parsed, slice.to_vec())?)
}

/// Optional date bound from Python (`None` or an ISO string).
#[cfg(feature = "python-bindings")]
pub fn extract_date(input: Option<&str>) -> PyResult<Option<NaiveDate>> {
    Ok(input.map(parse_date).transpose()?)
}

/// Solver options with optional overrides of the evaluation cap and damping.
#[cfg(feature = "python-bindings")]
pub fn extract_lsq_options(
    max_nfev: Option<usize>, initial_damping: Option<f64>,
) -> PyResult<LsqOptions> {
    let defaults = Tolerances::default();
    let tols = Tolerances::new(
        defaults.xtol,
        defaults.ftol,
        defaults.gtol,
        max_nfev.unwrap_or(defaults.max_nfev),
    )
    .map_err(MidasError::from)?;
    let damping = initial_damping.unwrap_or(LsqOptions::default().initial_damping);
    Ok(LsqOptions::new(tols, damping, false).map_err(MidasError::from)?)
}

#[cfg(feature = "python-bindings")]
pub fn extract_hac_options(
    kernel: Option<&str>, bandwidth: Option<usize>, center: Option<bool>,
    small_sample_correction: Option<bool>,
) -> PyResult<HACOptions> {
    let kernel_str = kernel.unwrap_or("bartlett").to_lowercase();
    let kernel_type = match kernel_str.as_str() {
        "iid" => KernelType::IID,
        "bartlett" | "newey_west" => KernelType::Bartlett,
        "parzen" => KernelType::Parzen,
        "quadratic_spectral" | "quadraticspectral" | "qs" => KernelType::QuadraticSpectral,
        other => {
            return Err(PyValueError::new_err(format!(
                "invalid HAC kernel {:?} (expected 'iid', 'bartlett', 'parzen', or 'quadratic_spectral')",
                other
            )));
        }
    };

    Ok(HACOptions::new(
        bandwidth,
        kernel_type,
        center.unwrap_or(false),
        small_sample_correction.unwrap_or(true),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // ISO dates parse with or without a time suffix; anything else fails.
    //
    // Given
    // -----
    // - "2020-03-01", "2020-03-01T00:00:00", "2020-03-01 12:00", "03/01/2020".
    //
    // Expect
    // ------
    // - The first three yield 2020-03-01; the last yields `InvalidDate`.
    fn parse_date_accepts_iso_forms_only() {
        // Arrange
        let expected = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();

        // Act & Assert
        for input in ["2020-03-01", "2020-03-01T00:00:00", " 2020-03-01 12:00"] {
            assert_eq!(parse_date(input), Ok(expected), "{input}");
        }
        assert_eq!(
            parse_date("03/01/2020"),
            Err(MidasError::InvalidDate { input: "03/01/2020".to_string() })
        );
        assert!(parse_dates(&["2020-01-01", "bad"]).is_err());
    }
}
