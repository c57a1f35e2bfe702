//! Sampling frequencies and their inference from observation spacing.
//!
//! Purpose
//! -------
//! Name the calendar frequencies a MIDAS series may be sampled at and infer
//! one from a sorted date vector when the caller does not supply it.
//!
//! Key behaviors
//! -------------
//! - [`Frequency`] parses case-insensitively from pandas-style codes
//!   (`D`, `B`, `W`, `M`, `Q`, `A`/`Y`) or full names.
//! - [`Frequency::infer`] classifies the median spacing in days:
//!   1 → daily (business-daily when no weekend date occurs), 6–8 → weekly,
//!   28–31 → monthly, 89–92 → quarterly, 365–366 → annual.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inference expects strictly increasing dates with at least two entries.
use crate::midas::errors::{MidasError, MidasResult};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Calendar sampling frequency of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Daily,
    Business,
    Weekly,
    Monthly,
    Quarterly,
    Annual,
}

impl Frequency {
    /// Infer the frequency of strictly increasing `dates` from the median
    /// spacing.
    ///
    /// # Errors
    /// - [`MidasError::CannotInferFrequency`] when fewer than two dates are
    ///   given or the median spacing matches no known frequency.
    pub fn infer(dates: &[NaiveDate]) -> MidasResult<Self> {
        if dates.len() < 2 {
            return Err(MidasError::CannotInferFrequency { median_days: 0 });
        }
        let mut gaps: Vec<i64> = dates.windows(2).map(|w| (w[1] - w[0]).num_days()).collect();
        gaps.sort_unstable();
        let median_days = gaps[gaps.len() / 2];
        match median_days {
            1 => {
                let has_weekend =
                    dates.iter().any(|d| matches!(d.weekday(), Weekday::Sat | Weekday::Sun));
                if has_weekend { Ok(Frequency::Daily) } else { Ok(Frequency::Business) }
            }
            6..=8 => Ok(Frequency::Weekly),
            28..=31 => Ok(Frequency::Monthly),
            89..=92 => Ok(Frequency::Quarterly),
            365..=366 => Ok(Frequency::Annual),
            _ => Err(MidasError::CannotInferFrequency { median_days }),
        }
    }
}

impl FromStr for Frequency {
    type Err = MidasError;

    /// Parse a frequency code or name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "d" | "daily" => Ok(Frequency::Daily),
            "b" | "bd" | "business" => Ok(Frequency::Business),
            "w" | "weekly" => Ok(Frequency::Weekly),
            "m" | "ms" | "me" | "monthly" => Ok(Frequency::Monthly),
            "q" | "qs" | "qe" | "quarterly" => Ok(Frequency::Quarterly),
            "a" | "y" | "as" | "ys" | "annual" | "yearly" => Ok(Frequency::Annual),
            _ => Err(MidasError::UnknownFrequency { code: s.to_string() }),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Frequency::Daily => "daily",
            Frequency::Business => "business-daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Annual => "annual",
        };
        f.write_str(name)
    }
}
