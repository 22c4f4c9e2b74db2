//! Ranking of trained models by held-out RMSE.

use crate::metrics::EvaluationResult;
use serde::{Deserialize, Serialize};

/// One row of the comparison report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedModel {
    pub name: String,
    pub evaluation: EvaluationResult,
}

/// Rank models by ascending RMSE.
///
/// The sort is stable, so models with equal RMSE keep their training
/// order; no further tie-breaking is applied.
pub fn rank_by_rmse(results: &[(String, EvaluationResult)]) -> Vec<RankedModel> {
    let mut ranked: Vec<RankedModel> = results
        .iter()
        .map(|(name, evaluation)| RankedModel {
            name: name.clone(),
            evaluation: *evaluation,
        })
        .collect();
    ranked.sort_by(|a, b| {
        a.evaluation
            .rmse
            .partial_cmp(&b.evaluation.rmse)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// The model with minimum RMSE, or None for an empty input.
pub fn select_best(results: &[(String, EvaluationResult)]) -> Option<String> {
    rank_by_rmse(results).into_iter().next().map(|m| m.name)
}
