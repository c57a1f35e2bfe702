//! Forecast accuracy metrics.
use crate::midas::errors::{MidasError, MidasResult};

/// Root-mean-square error between paired predictions and realizations.
///
/// # Errors
/// - [`MidasError::DimensionMismatch`] when the slices differ in length.
/// - [`MidasError::EmptySeries`] when both are empty.
pub fn rmse(predictions: &[f64], actuals: &[f64]) -> MidasResult<f64> {
    if predictions.len() != actuals.len() {
        return Err(MidasError::DimensionMismatch {
            what: "realized values",
            expected: predictions.len(),
            found: actuals.len(),
        });
    }
    if predictions.is_empty() {
        return Err(MidasError::EmptySeries);
    }
    let sse: f64 = predictions.iter().zip(actuals).map(|(p, a)| (a - p) * (a - p)).sum();
    Ok((sse / predictions.len() as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // RMSE of a known error vector, plus the two failure modes.
    //
    // Given
    // -----
    // - Errors (3, −4) → RMSE sqrt(12.5); mismatched and empty inputs.
    //
    // Expect
    // ------
    // - sqrt(12.5); `DimensionMismatch`; `EmptySeries`.
    fn rmse_matches_hand_computation() {
        // Act & Assert
        let value = rmse(&[1.0, 6.0], &[4.0, 2.0]).unwrap();
        assert!((value - 12.5f64.sqrt()).abs() < 1e-12);
        assert!(matches!(rmse(&[1.0], &[]), Err(MidasError::DimensionMismatch { .. })));
        assert_eq!(rmse(&[], &[]), Err(MidasError::EmptySeries));
    }
}
