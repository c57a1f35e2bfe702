//! Mixed-frequency alignment.
//!
//! Purpose
//! -------
//! Turn a low-frequency target series and a high-frequency regressor series
//! into aligned design blocks for an estimation span and the forecast span
//! that follows it.
//!
//! Key behaviors
//! -------------
//! - Lag specs are resolved against each series' own frequency (`xlag`
//!   against the regressor, `ylag` against the target).
//! - Feasibility floor: the first target index is at least `max(ylag, 1)`;
//!   if that date does not come after the regressor's `(xlag + horizon)`-th
//!   observation, the start advances to the first target date strictly
//!   after it.
//! - `start_date` snaps forward to the next target date and is clamped up
//!   to the floor. `end_date` (default: second-to-last target) snaps back to
//!   the previous target date and is clamped so at least one forecast
//!   target remains.
//! - The forecast span runs from the target date after `end_date` to the
//!   last target date covered by the regressor series.
//! - Regressor rows: for target date `t`, let `k` be the as-of index of `t`
//!   in the regressor series; the row is `x[k−h], x[k−h−1], …,
//!   x[k−h−xlag+1]` (most recent first).
//!
//! Invariants & assumptions
//! ------------------------
//! - Both inputs are [`TimeSeries`], hence sorted and finite.
//! - Anti-lookahead: every regressor observation used for target `t` has
//!   index at most `as_of(t) − horizon`; for `horizon ≥ 1` its date is
//!   strictly earlier than `t`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the quarterly/monthly scenario, floor advancement,
//!   date clamping, the anti-lookahead invariant and each failure mode.
use crate::midas::{
    core::{
        aligned::{AlignedWindow, WindowSlice},
        options::AlignSpec,
        series::TimeSeries,
    },
    errors::{MidasError, MidasResult},
};
use chrono::NaiveDate;
use ndarray::{Array1, Array2};
use std::ops::RangeInclusive;

/// Align `low` (target) and `high` (regressor) according to `spec`.
///
/// Errors
/// ------
/// - [`MidasError::UnmappedLagUnit`] for unresolvable lag strings.
/// - [`MidasError::ZeroLags`] when `xlag` resolves to zero.
/// - [`MidasError::InfeasibleAlignment`] when no non-empty estimation span
///   with a following forecast target exists.
/// - [`MidasError::NoAsOfObservation`] / [`MidasError::InsufficientHistory`]
///   when a target date lacks regressor coverage.
pub fn align(low: &TimeSeries, high: &TimeSeries, spec: &AlignSpec) -> MidasResult<AlignedWindow> {
    let xlag = spec.xlag.resolve(high.frequency())?;
    let ylag = spec.ylag.resolve(low.frequency())?;
    if xlag == 0 {
        return Err(MidasError::ZeroLags);
    }
    let horizon = spec.horizon;
    let bounds = estimation_bounds(low, high, xlag, ylag, horizon, spec)?;

    let estimation = build_slice(low, high, xlag, ylag, horizon, bounds.start..=bounds.end)?;
    let forecast = build_slice(low, high, xlag, ylag, horizon, bounds.end + 1..=bounds.last)?;
    Ok(AlignedWindow { estimation, forecast, xlag, ylag, horizon })
}

/// Resolved index bounds into the low-frequency series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bounds {
    start: usize,
    end: usize,
    last: usize,
}

fn infeasible(reason: impl Into<String>) -> MidasError {
    MidasError::InfeasibleAlignment { reason: reason.into() }
}

fn estimation_bounds(
    low: &TimeSeries, high: &TimeSeries, xlag: usize, ylag: usize, horizon: usize,
    spec: &AlignSpec,
) -> MidasResult<Bounds> {
    let n_low = low.len();
    let ylag_floor = ylag.max(1);
    if n_low < ylag_floor + 2 {
        return Err(infeasible(format!(
            "target series has {n_low} observations; {ylag} autoregressive lags need at least {}",
            ylag_floor + 2
        )));
    }
    let hf_floor = xlag + horizon;
    if hf_floor >= high.len() {
        return Err(infeasible(format!(
            "regressor series has {} observations; xlag + horizon = {hf_floor}",
            high.len()
        )));
    }

    let hf_floor_date = high.dates()[hf_floor];
    let mut floor = ylag_floor;
    if low.dates()[floor] < hf_floor_date {
        floor = low.first_after(hf_floor_date).ok_or_else(|| {
            infeasible(format!("no target date after the regressor floor {hf_floor_date}"))
        })?;
    }

    let start = match spec.start_date {
        Some(date) => low
            .first_on_or_after(date)
            .ok_or_else(|| infeasible(format!("start date {date} is after the last target")))?
            .max(floor),
        None => floor,
    };

    let mut last = n_low - 1;
    if low.last_date() > high.last_date() {
        last = low.as_of(high.last_date()).ok_or_else(|| {
            infeasible("regressor series ends before the first target date".to_string())
        })?;
    }
    if last == 0 {
        return Err(infeasible("no forecast target is covered by the regressor series"));
    }

    let end = match spec.end_date {
        Some(date) => low
            .as_of(date)
            .ok_or_else(|| infeasible(format!("end date {date} precedes the first target")))?,
        None => n_low - 2,
    };
    let end = end.min(last - 1);
    if end < start {
        return Err(infeasible(format!(
            "estimation span is empty: start {} is after end {}",
            low.dates()[start],
            low.dates()[end]
        )));
    }
    Ok(Bounds { start, end, last })
}

/// Build the design block for low-frequency indices in `range`.
fn build_slice(
    low: &TimeSeries, high: &TimeSeries, xlag: usize, ylag: usize, horizon: usize,
    range: RangeInclusive<usize>,
) -> MidasResult<WindowSlice> {
    let rows = range.clone().count();
    let mut dates: Vec<NaiveDate> = Vec::with_capacity(rows);
    let mut latest_hf_dates: Vec<NaiveDate> = Vec::with_capacity(rows);
    let mut target = Array1::<f64>::zeros(rows);
    let mut regressors = Array2::<f64>::zeros((rows, xlag));
    let mut ar_lags = (ylag > 0).then(|| Array2::<f64>::zeros((rows, ylag)));

    let lf_values = low.values();
    let hf_values = high.values();
    for (row, i) in range.enumerate() {
        let date = low.dates()[i];
        let k = high.as_of(date).ok_or(MidasError::NoAsOfObservation { date })?;
        let needed = horizon + xlag;
        if k + 1 < needed {
            return Err(MidasError::InsufficientHistory { date, needed, available: k + 1 });
        }
        let latest = k - horizon;
        for j in 0..xlag {
            regressors[[row, j]] = hf_values[latest - j];
        }
        if let Some(ar) = ar_lags.as_mut() {
            if i < ylag {
                return Err(infeasible(format!("target {date} has fewer than {ylag} prior observations")));
            }
            for l in 1..=ylag {
                ar[[row, l - 1]] = lf_values[i - l];
            }
        }
        target[row] = lf_values[i];
        dates.push(date);
        latest_hf_dates.push(high.dates()[latest]);
    }
    WindowSlice::new(dates, target, ar_lags, regressors, latest_hf_dates)
}
