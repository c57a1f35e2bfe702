//! Unified error surface for the optimization layer.
//!
//! Covers least-squares configuration mistakes (tolerances, evaluation caps,
//! damping), residual/Jacobian validation failures, linear-algebra
//! breakdowns in OLS, and normalized wrappers around `argmin` backend
//! errors. An alias `OptResult<T>` standardizes return types.
use argmin::core::{ArgminError, Error};

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Jacobian ----
    /// Implies that finite differences should be used.
    JacobianNotImplemented,

    /// Jacobian dimensions do not match (residuals × parameters).
    JacobianDimMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Jacobian entries need to be finite.
    InvalidJacobian {
        row: usize,
        col: usize,
        value: f64,
    },

    // ---- Residuals ----
    /// Residual vector is empty.
    EmptyResiduals,

    /// A residual is NaN or infinite.
    NonFiniteResidual {
        index: usize,
        value: f64,
    },

    // ---- LsqOptions ----
    /// Step tolerance needs to be positive and finite.
    InvalidXTol {
        tol: f64,
        reason: &'static str,
    },
    /// Cost reduction tolerance needs to be positive and finite.
    InvalidFTol {
        tol: f64,
        reason: &'static str,
    },
    /// Gradient tolerance needs to be positive and finite.
    InvalidGTol {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum function evaluations needs to be positive.
    InvalidMaxNfev {
        max_nfev: usize,
        reason: &'static str,
    },
    /// Initial damping factor needs to be positive and finite.
    InvalidDamping {
        value: f64,
        reason: &'static str,
    },

    // ---- Parameters ----
    /// Initial parameter vector is empty.
    EmptyTheta,

    /// Parameter vector length does not match what the model expects.
    ThetaLengthMismatch {
        expected: usize,
        actual: usize,
    },

    /// Unconstrained optimization input must have finite values.
    InvalidThetaInput {
        index: usize,
        value: f64,
    },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Theta hat is missing.
    MissingThetaHat,

    // ---- Linear algebra ----
    /// Design matrix and target disagree on the number of rows.
    DesignDimMismatch {
        rows: usize,
        target: usize,
    },

    /// Least-squares system has fewer observations than unknowns.
    Underdetermined {
        rows: usize,
        cols: usize,
    },

    /// SVD or linear solve failed.
    SingularSystem {
        reason: &'static str,
    },

    // ---- Argmin ----
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Jacobian ----
            OptError::JacobianNotImplemented => {
                write!(f, "Analytic Jacobian not implemented")
            }
            OptError::JacobianDimMismatch { expected, found } => {
                write!(f, "Jacobian dimension mismatch: expected {expected:?}, found {found:?}")
            }
            OptError::InvalidJacobian { row, col, value } => {
                write!(f, "Invalid Jacobian at ({row}, {col}): {value}, must be finite")
            }

            // ---- Residuals ----
            OptError::EmptyResiduals => {
                write!(f, "Residual vector is empty")
            }
            OptError::NonFiniteResidual { index, value } => {
                write!(f, "Non-finite residual at index {index}: {value}")
            }

            // ---- LsqOptions ----
            OptError::InvalidXTol { tol, reason } => {
                write!(f, "Invalid step tolerance {tol}: {reason}")
            }
            OptError::InvalidFTol { tol, reason } => {
                write!(f, "Invalid cost reduction tolerance {tol}: {reason}")
            }
            OptError::InvalidGTol { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxNfev { max_nfev, reason } => {
                write!(f, "Invalid maximum function evaluations {max_nfev}: {reason}")
            }
            OptError::InvalidDamping { value, reason } => {
                write!(f, "Invalid initial damping {value}: {reason}")
            }

            // ---- Parameters ----
            OptError::EmptyTheta => {
                write!(f, "Initial parameter vector is empty")
            }
            OptError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            OptError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid theta input at index {index}: {value}, must be finite")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }

            // ---- Linear algebra ----
            OptError::DesignDimMismatch { rows, target } => {
                write!(f, "Design matrix has {rows} rows but target has {target} entries")
            }
            OptError::Underdetermined { rows, cols } => {
                write!(f, "Least-squares system is underdetermined: {rows} rows, {cols} columns")
            }
            OptError::SingularSystem { reason } => {
                write!(f, "Linear solve failed: {reason}")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        // Errors raised inside our own adapter travel through argmin as
        // `anyhow`-style boxed errors; recover them first.
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}
