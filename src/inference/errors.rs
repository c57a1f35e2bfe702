//! Unified error handling for inference routines.
//!
//! This module defines `InferenceError`, the error type used by HAC
//! bandwidth selection, Gauss–Newton / sandwich covariance estimation and
//! the Student-t significance tests built on top of them. An alias
//! `InferenceResult<T>` standardizes the return type across inference code.
use crate::optimization::errors::OptError;

/// Unified error type for inference routines.
///
/// Covers plug-in bandwidth failures (callers usually fall back to a
/// rule-of-thumb bandwidth), shape and rank problems in the covariance
/// step, and Student-t construction failures.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Bandwidth selection ----
    /// Stationarity is violated in an AR(1) process.
    StationarityViolated {
        phi: f64,
    },

    /// Denominator is too close to zero in bandwidth calculation.
    DenominatorTooSmall {
        denominator: f64,
    },

    /// Order not supported for bandwidth calculation.
    OrderNotSupported {
        ord: usize,
    },

    /// AR(1) plug-in needs at least three observations.
    SeriesTooShort {
        len: usize,
    },

    /// Auxiliary AR(1) regression failed.
    AuxiliaryRegression(OptError),

    // ---- Covariance ----
    /// Jacobian or score matrix has no rows.
    EmptyScores,

    /// Shapes of θ, the Jacobian and the residuals disagree.
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// `JᵀJ` has no eigenvalue above the truncation threshold.
    SingularInformation,

    /// Fewer observations than parameters leaves no residual variance.
    InsufficientDegreesOfFreedom {
        observations: usize,
        parameters: usize,
    },

    // ---- Distribution ----
    /// Student-t distribution could not be constructed.
    StudentT {
        reason: String,
    },

    // ---- Fallback ----
    UnknownError,
}

pub type InferenceResult<T> = Result<T, InferenceError>;

impl std::error::Error for InferenceError {}

impl From<OptError> for InferenceError {
    fn from(err: OptError) -> Self {
        InferenceError::AuxiliaryRegression(err)
    }
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Bandwidth selection ----
            InferenceError::StationarityViolated { phi } => {
                write!(f, "Inference Error: Stationarity violated (phi = {})", phi)
            }
            InferenceError::DenominatorTooSmall { denominator } => write!(
                f,
                "Inference Error: Denominator too small ({}) in bandwidth calculation",
                denominator
            ),
            InferenceError::OrderNotSupported { ord } => {
                write!(f, "Inference Error: Order {} not supported for bandwidth calculation", ord)
            }
            InferenceError::SeriesTooShort { len } => {
                write!(f, "Inference Error: AR(1) plug-in needs at least 3 observations, got {len}")
            }
            InferenceError::AuxiliaryRegression(err) => {
                write!(f, "Inference Error: AR(1) regression failed: {err}")
            }

            // ---- Covariance ----
            InferenceError::EmptyScores => write!(f, "Inference Error: Score matrix is empty"),
            InferenceError::DimensionMismatch { what, expected, found } => write!(
                f,
                "Inference Error: Dimension mismatch for {what}: expected {expected}, found {found}"
            ),
            InferenceError::SingularInformation => {
                write!(f, "Inference Error: Information matrix is numerically zero")
            }
            InferenceError::InsufficientDegreesOfFreedom { observations, parameters } => write!(
                f,
                "Inference Error: {observations} observations cannot support {parameters} parameters"
            ),

            // ---- Distribution ----
            InferenceError::StudentT { reason } => {
                write!(f, "Inference Error: Student-t distribution unavailable: {reason}")
            }

            // ---- Fallback ----
            InferenceError::UnknownError => write!(f, "Inference Error: Unknown error occurred"),
        }
    }
}
