// ============================================================
// Layer 5 — Regression Scores
// ============================================================
// Goodness-of-fit metrics for the evaluation report.
//
//   R²   = 1 - Σ(y - ŷ)² / Σ(y - mean(y))²
//   MSLE = mean( (ln(1 + t) - ln(1 + p))² )
//
// R² is not symmetric: `y_true` sets the denominator. The run
// report scores with the predictions in that role, so saved
// scores and checkpoint names stay comparable across runs.
// MSLE is undefined below zero, so a negative (or NaN) value
// is an error, never a NaN score.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MetricError {
    #[error("cannot score an empty set")]
    Empty,

    #[error("{predictions} predictions for {targets} targets")]
    LengthMismatch { predictions: usize, targets: usize },

    #[error("mean squared log error cannot be used when {which} contain negative values (found {value} at index {index})")]
    NegativeValue { which: &'static str, index: usize, value: f64 },

    #[error("{which} contain a non-finite value ({value}) at index {index}")]
    NonFinite { which: &'static str, index: usize, value: f64 },
}

fn check_lengths(targets: &[f64], predictions: &[f64]) -> Result<(), MetricError> {
    if targets.len() != predictions.len() {
        return Err(MetricError::LengthMismatch {
            predictions: predictions.len(),
            targets:     targets.len(),
        });
    }
    if targets.is_empty() {
        return Err(MetricError::Empty);
    }
    Ok(())
}

/// Coefficient of determination of `y_pred` against `y_true`.
///
/// A constant `y_true` makes the denominator zero: the score is
/// then 1.0 for an exact fit and 0.0 otherwise.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> Result<f64, MetricError> {
    check_lengths(y_true, y_pred)?;

    let mean = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let ss_res: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)).sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

/// Mean squared logarithmic error.
pub fn mean_squared_log_error(targets: &[f64], predictions: &[f64]) -> Result<f64, MetricError> {
    check_lengths(targets, predictions)?;
    check_log_domain("targets", targets)?;
    check_log_domain("predictions", predictions)?;

    let sum: f64 = targets
        .iter()
        .zip(predictions)
        .map(|(t, p)| (t.ln_1p() - p.ln_1p()).powi(2))
        .sum();
    Ok(sum / targets.len() as f64)
}

fn check_log_domain(which: &'static str, values: &[f64]) -> Result<(), MetricError> {
    for (index, &value) in values.iter().enumerate() {
        if value.is_nan() || value.is_infinite() {
            return Err(MetricError::NonFinite { which, index, value });
        }
        if value < 0.0 {
            return Err(MetricError::NegativeValue { which, index, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_perfect_prediction() {
        let t = [1.10, 1.25, 1.31, 1.18];
        assert_eq!(r2_score(&t, &t).unwrap(), 1.0);
        assert_eq!(mean_squared_log_error(&t, &t).unwrap(), 0.0);
    }

    #[test]
    fn test_r2_known_value() {
        // mean 2, ss_tot = 2, ss_res = 0.5
        let r2 = r2_score(&[1.0, 2.0, 3.0], &[1.5, 2.0, 2.5]).unwrap();
        assert!((r2 - 0.75).abs() < EPS);
    }

    #[test]
    fn test_r2_predicting_the_mean_is_zero() {
        let r2 = r2_score(&[1.0, 2.0, 3.0], &[2.0, 2.0, 2.0]).unwrap();
        assert!(r2.abs() < EPS);
    }

    #[test]
    fn test_r2_depends_on_which_side_is_reference() {
        // mean of [1.5, 2, 2.5] is 2: ss_tot = 0.5, ss_res = 0.5
        let r2 = r2_score(&[1.5, 2.0, 2.5], &[1.0, 2.0, 3.0]).unwrap();
        assert!(r2.abs() < EPS);
    }

    #[test]
    fn test_r2_constant_reference() {
        assert_eq!(r2_score(&[4.0, 4.0], &[4.0, 4.0]).unwrap(), 1.0);
        assert_eq!(r2_score(&[4.0, 4.0], &[4.0, 5.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_msle_known_value() {
        let e = std::f64::consts::E;
        // ln(1 + (e - 1)) = 1, ln(1 + 0) = 0
        let msle = mean_squared_log_error(&[e - 1.0, 0.0], &[0.0, 0.0]).unwrap();
        assert!((msle - 0.5).abs() < EPS);
    }

    #[test]
    fn test_negative_target_is_an_error() {
        let err = mean_squared_log_error(&[1.0, -0.5], &[1.0, 1.0]).unwrap_err();
        assert_eq!(err, MetricError::NegativeValue { which: "targets", index: 1, value: -0.5 });
    }

    #[test]
    fn test_negative_prediction_is_an_error() {
        let err = mean_squared_log_error(&[1.0], &[-2.0]).unwrap_err();
        assert!(matches!(err, MetricError::NegativeValue { which: "predictions", .. }));
    }

    #[test]
    fn test_nan_is_an_error_not_a_score() {
        let err = mean_squared_log_error(&[f64::NAN], &[1.0]).unwrap_err();
        assert!(matches!(err, MetricError::NonFinite { which: "targets", index: 0, .. }));
    }

    #[test]
    fn test_shape_errors() {
        assert_eq!(r2_score(&[], &[]), Err(MetricError::Empty));
        assert_eq!(
            mean_squared_log_error(&[1.0], &[1.0, 2.0]),
            Err(MetricError::LengthMismatch { predictions: 2, targets: 1 })
        );
    }
}
