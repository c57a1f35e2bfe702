//! Out-of-sample evaluation protocols.
//!
//! Purpose
//! -------
//! Drive repeated align → fit → forecast cycles over a low/high-frequency
//! pair and collect the resulting point forecasts into an
//! [`EvaluationReport`].
//!
//! Key behaviors
//! -------------
//! - **Fixed**: one alignment and one fit; every row of the forecast slice
//!   becomes a record.
//! - **Rolling**: the estimation end advances one low-frequency period per
//!   step and the start follows it at a constant width (`config.window`, or
//!   the length of the first estimation window). A window longer than the
//!   first estimation window delays the first step until that many rows
//!   exist after the first window's start, so every step estimates on
//!   exactly `width` rows.
//! - **Recursive**: the start stays at the first window's start while the
//!   end advances.
//! - Rolling and Recursive record the forecast `forecast_horizon` steps past
//!   the estimation end, i.e. row `forecast_horizon − 1` of each forecast
//!   slice.
//!
//! Invariants & assumptions
//! ------------------------
//! - Alignment errors on the first step propagate. On later steps they end
//!   the loop, as does an estimation end that the aligner had to pull back
//!   or a forecast slice shorter than `forecast_horizon`.
//! - Estimation failures propagate; non-convergence only increments
//!   `non_converged`.
//! - Running out of data is not an error: a run that stops before its first
//!   record returns an empty report whose `rmse` is `None`.
use crate::midas::{
    core::{
        align::align,
        aligned::AlignedWindow,
        options::AlignSpec,
        series::TimeSeries,
    },
    errors::{MidasError, MidasResult},
    evaluation::{
        config::{EvaluationConfig, EvaluationMethod},
        records::{EvaluationReport, ForecastRecord},
    },
    models::midas::MidasModel,
};
use tracing::{debug, info, warn};

/// Run the configured evaluation protocol.
///
/// # Errors
/// - Configuration errors from [`EvaluationConfig::validate`].
/// - Alignment errors for the first estimation window.
/// - Estimation or forecasting errors from any step.
pub fn evaluate(
    low: &TimeSeries, high: &TimeSeries, config: &EvaluationConfig,
) -> MidasResult<EvaluationReport> {
    config.validate()?;
    let report = match config.method {
        EvaluationMethod::Fixed => fixed(low, high, config)?,
        EvaluationMethod::Rolling | EvaluationMethod::Recursive => stepped(low, high, config)?,
    };
    info!(
        method = %report.method,
        records = report.records.len(),
        fits = report.fits,
        non_converged = report.non_converged,
        rmse = ?report.rmse,
        "MIDAS evaluation finished"
    );
    Ok(report)
}

// ---- Helper methods ----

fn fixed(
    low: &TimeSeries, high: &TimeSeries, config: &EvaluationConfig,
) -> MidasResult<EvaluationReport> {
    let aligned = align(low, high, &config.align_spec())?;
    let model = MidasModel::new(config.model_options());
    let fit = model.fit(&aligned.estimation)?;
    let predictions = model.predict(&fit, &aligned.forecast)?;

    let forecast = &aligned.forecast;
    let records = forecast
        .dates
        .iter()
        .zip(predictions.iter())
        .zip(forecast.target.iter())
        .map(|((&date, &prediction), &actual)| ForecastRecord { date, prediction, actual })
        .collect();
    EvaluationReport::new(
        EvaluationMethod::Fixed,
        config.forecast_horizon,
        records,
        1,
        usize::from(!fit.converged()),
    )
}

fn stepped(
    low: &TimeSeries, high: &TimeSeries, config: &EvaluationConfig,
) -> MidasResult<EvaluationReport> {
    let first = align(low, high, &config.align_spec())?;
    let (s0, e0) = estimation_indices(low, &first)?;
    let width = config.window.unwrap_or(e0 - s0 + 1);
    let first_end = match config.method {
        EvaluationMethod::Rolling => e0.max(s0 + width - 1),
        _ => e0,
    };
    if first_end >= low.len() {
        debug!(window = width, available = low.len() - s0, "rolling window exceeds the sample");
    }
    let fh = config.forecast_horizon;
    let model = MidasModel::new(config.model_options());
    let base = AlignSpec::new(config.xlag, config.ylag, config.horizon);

    let mut records = Vec::new();
    let mut fits = 0usize;
    let mut non_converged = 0usize;
    for end in first_end..low.len() {
        let start = match config.method {
            EvaluationMethod::Rolling => end + 1 - width,
            _ => s0,
        };
        let dates = low.dates();
        let spec = base.with_dates(Some(dates[start]), Some(dates[end]));
        let aligned = match align(low, high, &spec) {
            Ok(aligned) => aligned,
            Err(err) => {
                warn!(end = %dates[end], error = %err, "alignment failed; stopping evaluation");
                break;
            }
        };
        if aligned.estimation.dates.last() != Some(&dates[end]) {
            debug!(end = %dates[end], "estimation end no longer reachable; stopping evaluation");
            break;
        }
        if aligned.forecast.len() < fh {
            debug!(
                end = %dates[end],
                available = aligned.forecast.len(),
                forecast_horizon = fh,
                "forecast window shorter than horizon; stopping evaluation"
            );
            break;
        }

        let fit = model.fit(&aligned.estimation)?;
        let predictions = model.predict(&fit, &aligned.forecast)?;
        fits += 1;
        non_converged += usize::from(!fit.converged());
        records.push(ForecastRecord {
            date: aligned.forecast.dates[fh - 1],
            prediction: predictions[fh - 1],
            actual: aligned.forecast.target[fh - 1],
        });
        debug!(
            start = %aligned.estimation.dates[0],
            end = %dates[end],
            rows = aligned.estimation.len(),
            target = %aligned.forecast.dates[fh - 1],
            "evaluation step complete"
        );
    }

    EvaluationReport::new(config.method, fh, records, fits, non_converged)
}

/// Positions in `low` of the first and last estimation dates.
fn estimation_indices(low: &TimeSeries, aligned: &AlignedWindow) -> MidasResult<(usize, usize)> {
    let locate = |date: Option<&chrono::NaiveDate>| {
        date.and_then(|&d| low.as_of(d)).ok_or_else(|| MidasError::InfeasibleAlignment {
            reason: "estimation window is empty".to_string(),
        })
    };
    Ok((locate(aligned.estimation.dates.first())?, locate(aligned.estimation.dates.last())?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};

    /// Monthly regressor and quarterly target (every third month) where the
    /// target is an exact MIDAS function of the regressor.
    fn quarterly_monthly(quarters: usize) -> (TimeSeries, TimeSeries) {
        let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let months = 3 * quarters;
        let mut seed = 7u64;
        let mut hf_dates = Vec::with_capacity(months);
        let mut hf_values = Vec::with_capacity(months);
        for m in 0..months {
            let date = start.checked_add_months(chrono::Months::new(m as u32)).unwrap();
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let u = (seed >> 11) as f64 / (1u64 << 53) as f64;
            hf_dates.push(date);
            hf_values.push((m as f64 * 0.4).sin() + u - 0.5);
        }
        let mut lf_dates = Vec::with_capacity(quarters);
        let mut lf_values = Vec::with_capacity(quarters);
        for q in 0..quarters {
            let k = 3 * q + 2;
            lf_dates.push(hf_dates[k]);
            let x = |j: usize| if k >= j { hf_values[k - j] } else { 0.0 };
            lf_values.push(0.3 + 1.5 * (0.5 * x(1) + 0.3 * x(2) + 0.2 * x(3)));
        }
        (
            TimeSeries::new(lf_dates, lf_values).unwrap(),
            TimeSeries::new(hf_dates, hf_values).unwrap(),
        )
    }

    fn config(method: &str) -> EvaluationConfig {
        EvaluationConfig::from_names("3", "1", 1, 1, "expalmon", method).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Fixed evaluation forecasts every row after the estimation end.
    //
    // Given
    // -----
    // - 40 quarters, estimation ending 10 quarters before the sample end.
    //
    // Expect
    // ------
    // - 10 records dated after the estimation end, finite RMSE, one fit.
    fn fixed_covers_remaining_span() {
        // Arrange
        let (low, high) = quarterly_monthly(40);
        let end = low.dates()[29];
        let config = config("fixed").with_dates(None, Some(end));

        // Act
        let report = evaluate(&low, &high, &config).unwrap();

        // Assert
        assert_eq!(report.records.len(), 10);
        assert_eq!(report.fits, 1);
        assert!(report.records.iter().all(|r| r.date > end));
        assert!(report.rmse.is_some_and(f64::is_finite));
    }

    #[test]
    // Purpose
    // -------
    // Rolling keeps a constant window width; Recursive keeps the start.
    //
    // Given
    // -----
    // - 40 quarters, first estimation window ending at quarter 29,
    //   forecast horizon 1.
    //
    // Expect
    // ------
    // - 10 one-step records for both methods, targets in calendar order and
    //   each one quarter after the previous.
    fn rolling_and_recursive_step_one_period() {
        // Arrange
        let (low, high) = quarterly_monthly(40);
        let end = low.dates()[29];

        for method in ["rolling", "recursive"] {
            // Act
            let report = evaluate(&low, &high, &config(method).with_dates(None, Some(end))).unwrap();

            // Assert
            assert_eq!(report.records.len(), 10, "{method}");
            assert_eq!(report.fits, 10);
            assert_eq!(report.records[0].date, low.dates()[30]);
            for pair in report.records.windows(2) {
                let months = (pair[1].date.year() - pair[0].date.year()) * 12
                    + pair[1].date.month() as i32
                    - pair[0].date.month() as i32;
                assert_eq!(months, 3);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // A longer forecast horizon records the matching step ahead and stops
    // when the forecast slice runs out.
    //
    // Given
    // -----
    // - Recursive, forecast horizon 3, first end at quarter 29 of 40.
    //
    // Expect
    // ------
    // - 8 records; the first dated at quarter 32.
    fn forecast_horizon_selects_step_ahead() {
        // Arrange
        let (low, high) = quarterly_monthly(40);
        let config = EvaluationConfig::from_names("3", "1", 1, 3, "expalmon", "recursive")
            .unwrap()
            .with_dates(None, Some(low.dates()[29]));

        // Act
        let report = evaluate(&low, &high, &config).unwrap();

        // Assert
        assert_eq!(report.records.len(), 8);
        assert_eq!(report.records[0].date, low.dates()[32]);
    }

    #[test]
    // Purpose
    // -------
    // With a single feasible step, Rolling and Recursive reproduce the
    // Fixed forecast exactly.
    //
    // Given
    // -----
    // - Default end (second-to-last target), forecast horizon 1.
    //
    // Expect
    // ------
    // - One record per method, identical predictions.
    fn single_step_matches_fixed() {
        // Arrange
        let (low, high) = quarterly_monthly(30);

        // Act
        let fixed = evaluate(&low, &high, &config("fixed")).unwrap();
        let rolling = evaluate(&low, &high, &config("rolling")).unwrap();
        let recursive = evaluate(&low, &high, &config("recursive")).unwrap();

        // Assert
        assert_eq!(fixed.records.len(), 1);
        assert_eq!(rolling.records, fixed.records);
        assert_eq!(recursive.records, fixed.records);
    }

    #[test]
    // Purpose
    // -------
    // A forecast horizon past the available data stops the run cleanly.
    //
    // Given
    // -----
    // - Default end (one forecast row) with forecast horizon 2.
    //
    // Expect
    // ------
    // - An empty Rolling report: no records, no fits, undefined RMSE.
    fn unreachable_horizon_returns_empty_report() {
        // Arrange
        let (low, high) = quarterly_monthly(30);
        let config = EvaluationConfig::from_names("3", "1", 1, 2, "expalmon", "rolling").unwrap();

        // Act
        let report = evaluate(&low, &high, &config).unwrap();

        // Assert
        assert_eq!(report.method, EvaluationMethod::Rolling);
        assert!(report.is_empty());
        assert_eq!(report.fits, 0);
        assert_eq!(report.rmse, None);
    }

    #[test]
    // Purpose
    // -------
    // A Rolling window longer than the first estimation window is honoured
    // at full width on every step.
    //
    // Given
    // -----
    // - 40 quarters, first window spanning quarters 1..=20, explicit window
    //   of 30 quarters.
    //
    // Expect
    // ------
    // - The first step waits until quarter 30, giving 9 records.
    // - Each record equals a Fixed forecast estimated on exactly the 30
    //   quarters ending one period before its target.
    fn long_rolling_window_keeps_full_width() {
        // Arrange
        let (low, high) = quarterly_monthly(40);
        let dates = low.dates();
        let width = 30;
        let rolling =
            config("rolling").with_dates(None, Some(dates[20])).with_window(width).unwrap();

        // Act
        let report = evaluate(&low, &high, &rolling).unwrap();

        // Assert
        assert_eq!(report.records.len(), 9);
        assert_eq!(report.fits, 9);
        assert_eq!(report.records[0].date, dates[31]);
        for record in &report.records {
            let end = low.as_of(record.date).unwrap() - 1;
            let start = dates[end + 1 - width];
            let window = config("fixed").with_dates(Some(start), Some(dates[end]));
            let aligned = align(&low, &high, &window.align_spec()).unwrap();
            let fixed = evaluate(&low, &high, &window).unwrap();

            assert_eq!(aligned.estimation.len(), width);
            assert_eq!(fixed.records[0], *record);
        }
    }
}
