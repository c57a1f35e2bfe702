//! Lag specifications: integer counts or duration strings.
//!
//! A [`LagSpec`] is either a bare count of periods or a duration such as
//! `"3m"` that is resolved against the sampling frequency of the series it
//! indexes. Resolution is a pure table lookup:
//!
//! | series frequency | units (periods per unit) |
//! |---|---|
//! | daily | d (1), w (7), m (30) |
//! | business-daily | b (1), w (5), m (22) |
//! | weekly | w (1) |
//! | monthly | m (1), q (3) |
//! | quarterly | q (1), y (4) |
//! | annual | y (1) |
//!
//! Any other pair fails with [`MidasError::UnmappedLagUnit`].
use crate::midas::{
    core::frequency::Frequency,
    errors::{MidasError, MidasResult},
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Calendar unit of a duration lag string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LagUnit {
    Day,
    BusinessDay,
    Week,
    Month,
    Quarter,
    Year,
}

impl LagUnit {
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "d" => Some(LagUnit::Day),
            "b" => Some(LagUnit::BusinessDay),
            "w" => Some(LagUnit::Week),
            "m" => Some(LagUnit::Month),
            "q" => Some(LagUnit::Quarter),
            "y" | "a" => Some(LagUnit::Year),
            _ => None,
        }
    }
}

impl std::fmt::Display for LagUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            LagUnit::Day => "d",
            LagUnit::BusinessDay => "b",
            LagUnit::Week => "w",
            LagUnit::Month => "m",
            LagUnit::Quarter => "q",
            LagUnit::Year => "y",
        };
        f.write_str(code)
    }
}

/// Number of `frequency` periods in one `unit`.
///
/// # Errors
/// - [`MidasError::UnmappedLagUnit`] when the pair is not in the table.
pub fn periods_per_unit(unit: LagUnit, frequency: Frequency) -> MidasResult<usize> {
    use Frequency as F;
    use LagUnit as U;
    let periods = match (frequency, unit) {
        (F::Daily, U::Day) => 1,
        (F::Daily, U::Week) => 7,
        (F::Daily, U::Month) => 30,
        (F::Business, U::BusinessDay) => 1,
        (F::Business, U::Week) => 5,
        (F::Business, U::Month) => 22,
        (F::Weekly, U::Week) => 1,
        (F::Monthly, U::Month) => 1,
        (F::Monthly, U::Quarter) => 3,
        (F::Quarterly, U::Quarter) => 1,
        (F::Quarterly, U::Year) => 4,
        (F::Annual, U::Year) => 1,
        _ => return Err(MidasError::UnmappedLagUnit { unit, frequency }),
    };
    Ok(periods)
}

/// Lag depth, either a count of periods or a calendar duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LagSpec {
    Count(usize),
    Duration { count: usize, unit: LagUnit },
}

impl LagSpec {
    /// Resolve into a number of periods of a series sampled at `frequency`.
    ///
    /// # Errors
    /// - [`MidasError::UnmappedLagUnit`] for durations outside the table.
    pub fn resolve(&self, frequency: Frequency) -> MidasResult<usize> {
        match *self {
            LagSpec::Count(n) => Ok(n),
            LagSpec::Duration { count, unit } => Ok(count * periods_per_unit(unit, frequency)?),
        }
    }
}

impl From<usize> for LagSpec {
    fn from(n: usize) -> Self {
        LagSpec::Count(n)
    }
}

impl FromStr for LagSpec {
    type Err = MidasError;

    /// Parse `"<count>"` or `"<count><unit>"` (unit ∈ d, b, w, m, q, y; case
    /// insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_lowercase();
        let split = trimmed.find(|c: char| !c.is_ascii_digit()).unwrap_or(trimmed.len());
        let (digits, suffix) = trimmed.split_at(split);
        if digits.is_empty() {
            return Err(MidasError::InvalidLagString {
                spec: s.to_string(),
                reason: "expected a leading non-negative integer count",
            });
        }
        let count: usize = digits.parse().map_err(|_| MidasError::InvalidLagString {
            spec: s.to_string(),
            reason: "count does not fit in an unsigned integer",
        })?;
        if suffix.is_empty() {
            return Ok(LagSpec::Count(count));
        }
        match LagUnit::from_suffix(suffix) {
            Some(unit) => Ok(LagSpec::Duration { count, unit }),
            None => Err(MidasError::InvalidLagString {
                spec: s.to_string(),
                reason: "unit must be one of d, b, w, m, q, y",
            }),
        }
    }
}

impl std::fmt::Display for LagSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LagSpec::Count(n) => write!(f, "{n}"),
            LagSpec::Duration { count, unit } => write!(f, "{count}{unit}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Resolve the documented lag strings against a monthly series.
    //
    // Given
    // -----
    // - "3m", "1q" and "1y" against `Frequency::Monthly`.
    //
    // Expect
    // ------
    // - 3, 3, and an `UnmappedLagUnit` configuration error.
    fn lag_strings_resolve_against_monthly_series() {
        // Arrange
        let three_months: LagSpec = "3m".parse().unwrap();
        let one_quarter: LagSpec = "1q".parse().unwrap();
        let one_year: LagSpec = "1y".parse().unwrap();

        // Act & Assert
        assert_eq!(three_months.resolve(Frequency::Monthly), Ok(3));
        assert_eq!(one_quarter.resolve(Frequency::Monthly), Ok(3));
        assert_eq!(
            one_year.resolve(Frequency::Monthly),
            Err(MidasError::UnmappedLagUnit { unit: LagUnit::Year, frequency: Frequency::Monthly })
        );
    }

    #[test]
    // Purpose
    // -------
    // Cover the daily and business-daily rows of the conversion table.
    //
    // Given
    // -----
    // - "1m" and "2w" against daily and business-daily series.
    //
    // Expect
    // ------
    // - 30 / 14 for daily, 22 / 10 for business-daily.
    fn day_based_frequencies_use_calendar_ratios() {
        // Arrange
        let month: LagSpec = "1m".parse().unwrap();
        let weeks: LagSpec = "2W".parse().unwrap();

        // Act & Assert
        assert_eq!(month.resolve(Frequency::Daily), Ok(30));
        assert_eq!(weeks.resolve(Frequency::Daily), Ok(14));
        assert_eq!(month.resolve(Frequency::Business), Ok(22));
        assert_eq!(weeks.resolve(Frequency::Business), Ok(10));
    }

    #[test]
    // Purpose
    // -------
    // Ensure malformed lag strings are rejected and bare counts pass through.
    //
    // Given
    // -----
    // - "4", "m3", "3x", "".
    //
    // Expect
    // ------
    // - `Count(4)` for "4" (frequency-independent); `InvalidLagString` otherwise.
    fn malformed_lag_strings_are_rejected() {
        // Act & Assert
        assert_eq!("4".parse::<LagSpec>(), Ok(LagSpec::Count(4)));
        assert_eq!(LagSpec::Count(4).resolve(Frequency::Annual), Ok(4));
        for bad in ["m3", "3x", ""] {
            assert!(matches!(bad.parse::<LagSpec>(), Err(MidasError::InvalidLagString { .. })));
        }
    }
}
