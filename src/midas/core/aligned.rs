//! Aligned design blocks produced by the aligner.
//!
//! A [`WindowSlice`] holds everything the estimator or forecaster needs for
//! one span of low-frequency dates: targets, optional AR-lag columns and the
//! high-frequency lag rows. An [`AlignedWindow`] pairs the estimation slice
//! with the forecast slice that immediately follows it.
use crate::midas::errors::{MidasError, MidasResult};
use chrono::NaiveDate;
use ndarray::{Array1, Array2};

/// One aligned span.
///
/// Invariants (checked by [`WindowSlice::new`]):
/// - `target`, `regressors` rows, `ar_lags` rows, `dates` and
///   `latest_hf_dates` all have the same length.
/// - `regressors` has `xlag` columns, most recent lag first.
/// - `ar_lags` is `None` iff `ylag == 0`; otherwise it has `ylag` columns,
///   column `l − 1` holding the target lagged by `l`.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSlice {
    pub dates: Vec<NaiveDate>,
    pub target: Array1<f64>,
    pub ar_lags: Option<Array2<f64>>,
    pub regressors: Array2<f64>,
    /// Date of the most recent high-frequency observation used in each row.
    pub latest_hf_dates: Vec<NaiveDate>,
}

impl WindowSlice {
    /// Assemble a slice, checking row counts agree.
    ///
    /// # Errors
    /// - [`MidasError::DimensionMismatch`] naming the offending component.
    pub fn new(
        dates: Vec<NaiveDate>, target: Array1<f64>, ar_lags: Option<Array2<f64>>,
        regressors: Array2<f64>, latest_hf_dates: Vec<NaiveDate>,
    ) -> MidasResult<Self> {
        let n = target.len();
        let check = |what: &'static str, found: usize| -> MidasResult<()> {
            if found != n {
                return Err(MidasError::DimensionMismatch { what, expected: n, found });
            }
            Ok(())
        };
        check("dates", dates.len())?;
        check("regressor rows", regressors.nrows())?;
        check("high-frequency dates", latest_hf_dates.len())?;
        if let Some(ar) = &ar_lags {
            check("autoregressive lag rows", ar.nrows())?;
        }
        Ok(Self { dates, target, ar_lags, regressors, latest_hf_dates })
    }

    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    pub fn xlag(&self) -> usize {
        self.regressors.ncols()
    }

    pub fn ylag(&self) -> usize {
        self.ar_lags.as_ref().map_or(0, |a| a.ncols())
    }
}

/// Estimation and forecast slices for one alignment call.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedWindow {
    pub estimation: WindowSlice,
    pub forecast: WindowSlice,
    pub xlag: usize,
    pub ylag: usize,
    pub horizon: usize,
}
