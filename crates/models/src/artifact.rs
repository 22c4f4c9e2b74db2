//! The fitted model artifact and its single prediction dispatch.
//!
//! All five model variants live in one tagged enum; scoring a (user, item)
//! pair is a match over the tag. The KNN variants need the training matrix
//! at prediction time, so callers pass a `PredictContext` holding the
//! matrix and the global training mean.
//!
//! Fallback rule, shared by every variant: if the user or item was unseen
//! in training, or a similarity-weighted denominator is zero, the
//! prediction is the global training mean. "Unseen" and "zero weight sum"
//! are deliberately not distinguished.

use crate::matrix::{dot, Dense, UserItemMatrix};
use crate::svd::SvdFactors;
use data_loader::{ItemId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rating scale bounds; model scores are clamped into this range.
pub const RATING_MIN: f64 = 1.0;
pub const RATING_MAX: f64 = 5.0;

/// Everything a prediction needs besides the artifact itself.
#[derive(Debug, Clone, Copy)]
pub struct PredictContext<'a> {
    pub matrix: &'a UserItemMatrix,
    pub global_mean: f64,
}

/// A fitted model, exactly one variant per trainer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Artifact {
    /// No fitted state. Scored as the global mean at serving time so that
    /// repeated `recommend` calls stay byte-identical; the uniform draws
    /// only happen inside the trainer's evaluation.
    Random,
    /// Per-item training means plus the global mean fallback.
    Popularity {
        item_means: BTreeMap<ItemId, f64>,
        global_mean: f64,
    },
    /// Dense user-by-user cosine similarity.
    UserKnn { user_similarity: Dense },
    /// Dense item-by-item cosine similarity.
    ItemKnn { item_similarity: Dense },
    /// Truncated SVD factors.
    Svd { factors: SvdFactors },
}

impl Artifact {
    /// Canonical model name, used for ranking output and bundle file names.
    pub fn name(&self) -> &'static str {
        match self {
            Artifact::Random => "random",
            Artifact::Popularity { .. } => "popularity",
            Artifact::UserKnn { .. } => "knn_user",
            Artifact::ItemKnn { .. } => "knn_item",
            Artifact::Svd { .. } => "svd",
        }
    }

    /// Predicted rating for a (user, item) pair.
    pub fn predict(&self, ctx: &PredictContext<'_>, user_id: UserId, item_id: ItemId) -> f64 {
        match self {
            Artifact::Random => ctx.global_mean,

            Artifact::Popularity {
                item_means,
                global_mean,
            } => item_means.get(&item_id).copied().unwrap_or(*global_mean),

            Artifact::UserKnn { user_similarity } => {
                let (Some(user_pos), Some(item_pos)) =
                    (ctx.matrix.user_pos(user_id), ctx.matrix.item_pos(item_id))
                else {
                    return ctx.global_mean;
                };
                let similarities = user_similarity.row(user_pos);
                let item_ratings = ctx.matrix.item_column(item_pos);
                weighted_average(similarities, &item_ratings, ctx.global_mean)
            }

            Artifact::ItemKnn { item_similarity } => {
                let (Some(user_pos), Some(item_pos)) =
                    (ctx.matrix.user_pos(user_id), ctx.matrix.item_pos(item_id))
                else {
                    return ctx.global_mean;
                };
                let similarities = item_similarity.row(item_pos);
                let user_ratings = ctx.matrix.user_row(user_pos);
                weighted_average(similarities, user_ratings, ctx.global_mean)
            }

            Artifact::Svd { factors } => {
                let (Some(user_pos), Some(item_pos)) =
                    (ctx.matrix.user_pos(user_id), ctx.matrix.item_pos(item_id))
                else {
                    return ctx.global_mean;
                };
                factors
                    .predict(user_pos, item_pos)
                    .clamp(RATING_MIN, RATING_MAX)
            }
        }
    }
}

/// Similarity-weighted average of ratings, clamped to the rating scale.
/// Falls back to `global_mean` when the weight sum is zero.
fn weighted_average(similarities: &[f64], ratings: &[f64], global_mean: f64) -> f64 {
    let weighted_sum = dot(similarities, ratings);
    let weight_sum: f64 = similarities.iter().map(|s| s.abs()).sum();
    if weight_sum > 0.0 {
        (weighted_sum / weight_sum).clamp(RATING_MIN, RATING_MAX)
    } else {
        global_mean
    }
}
