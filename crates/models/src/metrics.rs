//! Evaluation metrics for predicted ratings.

use serde::{Deserialize, Serialize};

/// Accuracy of one model over the held-out test split. Computed once,
/// never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub rmse: f64,
    pub mae: f64,
}

impl EvaluationResult {
    /// Compute RMSE and MAE from paired predictions and actual ratings.
    pub fn from_predictions(predictions: &[f64], actuals: &[f64]) -> Self {
        assert_eq!(
            predictions.len(),
            actuals.len(),
            "predictions and actuals must be paired"
        );
        Self {
            rmse: rmse(predictions, actuals),
            mae: mae(predictions, actuals),
        }
    }
}

/// Root-mean-square error. Returns 0.0 for empty input.
pub fn rmse(predictions: &[f64], actuals: &[f64]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = predictions
        .iter()
        .zip(actuals.iter())
        .map(|(p, a)| (p - a) * (p - a))
        .sum();
    (sum_sq / predictions.len() as f64).sqrt()
}

/// Mean absolute error. Returns 0.0 for empty input.
pub fn mae(predictions: &[f64], actuals: &[f64]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let sum_abs: f64 = predictions
        .iter()
        .zip(actuals.iter())
        .map(|(p, a)| (p - a).abs())
        .sum();
    sum_abs / predictions.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_predictions_score_zero() {
        let values = vec![1.0, 3.0, 5.0];
        assert_eq!(rmse(&values, &values), 0.0);
        assert_eq!(mae(&values, &values), 0.0);
    }

    #[test]
    fn known_errors() {
        let predictions = vec![2.0, 4.0];
        let actuals = vec![1.0, 2.0];
        // errors 1 and 2: mae = 1.5, rmse = sqrt((1 + 4) / 2)
        assert!((mae(&predictions, &actuals) - 1.5).abs() < 1e-12);
        assert!((rmse(&predictions, &actuals) - (2.5f64).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn metrics_are_non_negative() {
        let result = EvaluationResult::from_predictions(&[1.0, 5.0, 2.5], &[5.0, 1.0, 2.5]);
        assert!(result.rmse >= 0.0);
        assert!(result.mae >= 0.0);
        // RMSE dominates MAE
        assert!(result.rmse >= result.mae);
    }
}
