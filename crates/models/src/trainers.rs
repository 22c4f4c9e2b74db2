//! The five baseline trainers and the shared evaluation loop.
//!
//! Every trainer consumes the training split (and the user-item matrix
//! where relevant), produces an [`Artifact`], and is scored once against
//! the held-out test split. Training order is fixed (random, popularity,
//! knn_user, knn_item, svd) because the comparator's tie-break depends on it.

use crate::artifact::{Artifact, PredictContext};
use crate::matrix::UserItemMatrix;
use crate::metrics::EvaluationResult;
use crate::similarity::{cosine_columns, cosine_rows};
use crate::split::TrainTestSplit;
use crate::svd::{TruncatedSvd, SVD_RANK, SVD_SEED};
use data_loader::{mean_rating, ItemId, Rating};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::info;

/// Seed for the random baseline's evaluation draws.
pub const RANDOM_EVAL_SEED: u64 = 42;

/// A fitted artifact together with its held-out evaluation.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub artifact: Artifact,
    pub evaluation: EvaluationResult,
}

/// Score an artifact over the test split with the shared dispatch.
fn evaluate(artifact: &Artifact, ctx: &PredictContext<'_>, test: &[Rating]) -> EvaluationResult {
    let predictions: Vec<f64> = test
        .iter()
        .map(|r| artifact.predict(ctx, r.user_id, r.item_id))
        .collect();
    let actuals: Vec<f64> = test.iter().map(|r| r.rating as f64).collect();
    EvaluationResult::from_predictions(&predictions, &actuals)
}

/// Random baseline: uniform draws over the rating scale, no fitted state.
pub fn fit_random(split: &TrainTestSplit, seed: u64) -> TrainedModel {
    let mut rng = StdRng::seed_from_u64(seed);
    let predictions: Vec<f64> = split
        .test
        .iter()
        .map(|_| rng.random_range(1.0..=5.0))
        .collect();
    let actuals: Vec<f64> = split.test.iter().map(|r| r.rating as f64).collect();
    let evaluation = EvaluationResult::from_predictions(&predictions, &actuals);

    info!(rmse = evaluation.rmse, mae = evaluation.mae, "random baseline evaluated");
    TrainedModel {
        artifact: Artifact::Random,
        evaluation,
    }
}

/// Popularity baseline: per-item training mean, global mean fallback.
/// Ignores the user dimension entirely.
pub fn fit_popularity(split: &TrainTestSplit, matrix: &UserItemMatrix) -> TrainedModel {
    let global_mean = mean_rating(&split.train);

    let mut sums: BTreeMap<ItemId, (f64, u32)> = BTreeMap::new();
    for r in &split.train {
        let entry = sums.entry(r.item_id).or_insert((0.0, 0));
        entry.0 += r.rating as f64;
        entry.1 += 1;
    }
    let item_means: BTreeMap<ItemId, f64> = sums
        .into_iter()
        .map(|(item, (sum, count))| (item, sum / count as f64))
        .collect();

    let artifact = Artifact::Popularity {
        item_means,
        global_mean,
    };
    let ctx = PredictContext {
        matrix,
        global_mean,
    };
    let evaluation = evaluate(&artifact, &ctx, &split.test);

    info!(rmse = evaluation.rmse, mae = evaluation.mae, "popularity model evaluated");
    TrainedModel {
        artifact,
        evaluation,
    }
}

/// User-based KNN: cosine similarity between user rating vectors.
pub fn fit_user_knn(split: &TrainTestSplit, matrix: &UserItemMatrix) -> TrainedModel {
    let start = Instant::now();
    let user_similarity = cosine_rows(matrix.values());
    info!(
        users = matrix.n_users(),
        elapsed = ?start.elapsed(),
        "user similarity matrix computed"
    );

    let artifact = Artifact::UserKnn { user_similarity };
    let ctx = PredictContext {
        matrix,
        global_mean: mean_rating(&split.train),
    };
    let evaluation = evaluate(&artifact, &ctx, &split.test);

    info!(rmse = evaluation.rmse, mae = evaluation.mae, "user KNN evaluated");
    TrainedModel {
        artifact,
        evaluation,
    }
}

/// Item-based KNN: cosine similarity between item rating vectors.
pub fn fit_item_knn(split: &TrainTestSplit, matrix: &UserItemMatrix) -> TrainedModel {
    let start = Instant::now();
    let item_similarity = cosine_columns(matrix.values());
    info!(
        items = matrix.n_items(),
        elapsed = ?start.elapsed(),
        "item similarity matrix computed"
    );

    let artifact = Artifact::ItemKnn { item_similarity };
    let ctx = PredictContext {
        matrix,
        global_mean: mean_rating(&split.train),
    };
    let evaluation = evaluate(&artifact, &ctx, &split.test);

    info!(rmse = evaluation.rmse, mae = evaluation.mae, "item KNN evaluated");
    TrainedModel {
        artifact,
        evaluation,
    }
}

/// Truncated SVD, rank 50, fixed seed.
pub fn fit_svd(split: &TrainTestSplit, matrix: &UserItemMatrix) -> TrainedModel {
    let start = Instant::now();
    let factors = TruncatedSvd::new(SVD_RANK, SVD_SEED).fit(matrix.values());
    info!(
        rank = factors.singular_values.len(),
        elapsed = ?start.elapsed(),
        "SVD factorization fitted"
    );

    let artifact = Artifact::Svd { factors };
    let ctx = PredictContext {
        matrix,
        global_mean: mean_rating(&split.train),
    };
    let evaluation = evaluate(&artifact, &ctx, &split.test);

    info!(rmse = evaluation.rmse, mae = evaluation.mae, "SVD model evaluated");
    TrainedModel {
        artifact,
        evaluation,
    }
}

/// Fit and evaluate all five baselines, in canonical training order.
pub fn fit_all(split: &TrainTestSplit, matrix: &UserItemMatrix) -> Vec<TrainedModel> {
    vec![
        fit_random(split, RANDOM_EVAL_SEED),
        fit_popularity(split, matrix),
        fit_user_knn(split, matrix),
        fit_item_knn(split, matrix),
        fit_svd(split, matrix),
    ]
}
