//! core: series, calendar handling, weight kernels and alignment.
//!
//! Purpose
//! -------
//! Collect the building blocks every MIDAS fit and evaluation step relies
//! on: validated date-indexed series, sampling frequencies, lag
//! specifications, lag-weighting kernels, and the mixed-frequency aligner
//! that turns two series into estimation and forecast design blocks.
//!
//! Key behaviors
//! -------------
//! - [`TimeSeries`] sorts and validates its input and infers a
//!   [`Frequency`] from the date spacing.
//! - [`LagSpec`] resolves counts or duration strings (`"3m"`, `"1q"`)
//!   against a series frequency.
//! - [`WeightKernel`] maps kernel parameters to normalized lag weights and
//!   collapses a lag matrix into one weighted regressor column.
//! - [`align`] produces an [`AlignedWindow`] honouring the publication
//!   horizon, so no regressor row uses data released after its target.
//!
//! Invariants & assumptions
//! ------------------------
//! - Lag matrices store the most recent lag in column 0.
//! - Every [`WindowSlice`] has matching row counts across its components.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based. Dates are `chrono::NaiveDate`; intraday
//!   timestamps are out of scope.
//! - This module does no logging; failures are reported through
//!   [`MidasResult`](crate::midas::errors::MidasResult).
//!
//! Downstream usage
//! ----------------
//! - `midas::models` fits and forecasts from [`WindowSlice`]s.
//! - `midas::evaluation` calls [`align`] repeatedly with shifted date
//!   bounds.
//!
//! Testing notes
//! -------------
//! - Each submodule carries its own unit tests; the end-to-end quarterly /
//!   monthly scenario lives in `tests/integration_midas_pipeline.rs`.

pub mod align;
pub mod aligned;
pub mod frequency;
pub mod kernels;
pub mod lags;
pub mod options;
pub mod series;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::align::align;
pub use self::aligned::{AlignedWindow, WindowSlice};
pub use self::frequency::Frequency;
pub use self::kernels::WeightKernel;
pub use self::lags::{LagSpec, LagUnit, periods_per_unit};
pub use self::options::{AlignSpec, MidasOptions};
pub use self::series::TimeSeries;
