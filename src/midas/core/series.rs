//! Validated, date-indexed time series.
//!
//! Purpose
//! -------
//! Hold one low- or high-frequency series as sorted `(date, value)` pairs
//! with a known sampling frequency, and answer the calendar lookups the
//! aligner needs.
//!
//! Key behaviors
//! -------------
//! - [`TimeSeries::new`] sorts its input ascending, rejects duplicates,
//!   empty input and non-finite values, and infers the frequency.
//! - [`TimeSeries::with_frequency`] does the same with an explicit
//!   frequency (needed for single-observation or irregular series).
//! - [`TimeSeries::as_of`] is the "as-of" lookup: the latest observation at
//!   or before a date.
//!
//! Invariants & assumptions
//! ------------------------
//! - Dates are strictly increasing and `dates.len() == values.len() ≥ 1`.
//! - The series is immutable once constructed.
use crate::midas::{
    core::frequency::Frequency,
    errors::{MidasError, MidasResult},
};
use chrono::NaiveDate;
use ndarray::Array1;

/// Sorted, finite, date-indexed series with a sampling frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    dates: Vec<NaiveDate>,
    values: Array1<f64>,
    frequency: Frequency,
}

impl TimeSeries {
    /// Build a series and infer its frequency from the date spacing.
    ///
    /// # Errors
    /// - Any error from [`TimeSeries::with_frequency`] validation.
    /// - [`MidasError::CannotInferFrequency`] for irregular spacing.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> MidasResult<Self> {
        let (dates, values) = sort_and_validate(dates, values)?;
        let frequency = Frequency::infer(&dates)?;
        Ok(Self { dates, values: Array1::from(values), frequency })
    }

    /// Build a series with an explicit sampling frequency.
    ///
    /// # Errors
    /// - [`MidasError::SeriesLengthMismatch`], [`MidasError::EmptySeries`],
    ///   [`MidasError::NonFiniteValue`], [`MidasError::DuplicateTimestamp`].
    pub fn with_frequency(
        dates: Vec<NaiveDate>, values: Vec<f64>, frequency: Frequency,
    ) -> MidasResult<Self> {
        let (dates, values) = sort_and_validate(dates, values)?;
        Ok(Self { dates, values: Array1::from(values), frequency })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Always `false` for a constructed series; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn first_date(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn last_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    /// Index of the latest observation dated at or before `date`.
    pub fn as_of(&self, date: NaiveDate) -> Option<usize> {
        self.dates.partition_point(|d| *d <= date).checked_sub(1)
    }

    /// Index of the earliest observation dated at or after `date`.
    pub fn first_on_or_after(&self, date: NaiveDate) -> Option<usize> {
        let idx = self.dates.partition_point(|d| *d < date);
        (idx < self.dates.len()).then_some(idx)
    }

    /// Index of the earliest observation dated strictly after `date`.
    pub fn first_after(&self, date: NaiveDate) -> Option<usize> {
        let idx = self.dates.partition_point(|d| *d <= date);
        (idx < self.dates.len()).then_some(idx)
    }

    /// Index of the latest observation dated strictly before `date`.
    pub fn last_before(&self, date: NaiveDate) -> Option<usize> {
        self.dates.partition_point(|d| *d < date).checked_sub(1)
    }
}

// ---- Helper Methods ----

fn sort_and_validate(
    dates: Vec<NaiveDate>, values: Vec<f64>,
) -> MidasResult<(Vec<NaiveDate>, Vec<f64>)> {
    if dates.len() != values.len() {
        return Err(MidasError::SeriesLengthMismatch { dates: dates.len(), values: values.len() });
    }
    if dates.is_empty() {
        return Err(MidasError::EmptySeries);
    }
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(MidasError::NonFiniteValue { index, value });
        }
    }
    let mut pairs: Vec<(NaiveDate, f64)> = dates.into_iter().zip(values).collect();
    pairs.sort_by_key(|(d, _)| *d);
    if let Some(w) = pairs.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(MidasError::DuplicateTimestamp { date: w[0].0 });
    }
    Ok(pairs.into_iter().unzip())
}
