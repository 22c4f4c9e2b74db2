//! One-shot training orchestration.
//!
//! ## Algorithm
//! 1. Load the ratings and movie tables from the data directory
//! 2. Split 80/20 with the fixed seed
//! 3. Build the user-item matrix from the training split
//! 4. Fit and evaluate all five baselines
//! 5. Rank by held-out RMSE and pick the winner
//! 6. Persist the winning artifact and the auxiliary bundle

use crate::report::{DatasetSummary, TrainingReport};
use anyhow::{Context, Result, anyhow};
use data_loader::Dataset;
use engine::{AuxiliaryData, save_artifact};
use models::{
    SPLIT_SEED, TEST_FRACTION, UserItemMatrix, fit_all, rank_by_rmse, select_best,
    train_test_split,
};
use std::path::Path;
use tracing::{info, instrument};

/// Run the full training pass and persist the winning model under
/// `models_dir`, creating the directory if needed.
#[instrument(skip_all, fields(data_dir = %data_dir.display()))]
pub fn run_training(data_dir: &Path, models_dir: &Path) -> Result<TrainingReport> {
    let dataset = Dataset::load_from_dir(data_dir)
        .with_context(|| format!("loading dataset from {}", data_dir.display()))?;
    let summary = DatasetSummary::describe(&dataset);
    info!(
        n_ratings = summary.n_ratings,
        n_users = summary.n_users,
        n_movies = summary.n_movies,
        global_mean = summary.global_mean,
        sparsity = summary.sparsity,
        "dataset loaded"
    );

    let split = train_test_split(&dataset.ratings, TEST_FRACTION, SPLIT_SEED);
    let split_hash = split.partition_hash();
    info!(
        train = split.train.len(),
        test = split.test.len(),
        split_hash,
        "train/test split ready"
    );

    let matrix = UserItemMatrix::from_ratings(&split.train);
    let trained = fit_all(&split, &matrix);

    let results: Vec<_> = trained
        .iter()
        .map(|m| (m.artifact.name().to_string(), m.evaluation))
        .collect();
    let ranking = rank_by_rmse(&results);
    let best_model =
        select_best(&results).ok_or_else(|| anyhow!("no models were trained"))?;
    info!(best = %best_model, "model comparison complete");

    std::fs::create_dir_all(models_dir)
        .with_context(|| format!("creating models directory {}", models_dir.display()))?;
    let winner = trained
        .iter()
        .find(|m| m.artifact.name() == best_model)
        .ok_or_else(|| anyhow!("winning model {best_model} missing from training output"))?;
    let artifact_path = save_artifact(models_dir, &winner.artifact)
        .context("persisting winning artifact")?;

    let train_len = split.train.len();
    let test_len = split.test.len();
    let auxiliary = AuxiliaryData {
        movies: dataset.movies,
        ratings: dataset.ratings,
        matrix,
        train: split.train,
    };
    let auxiliary_path = auxiliary
        .save(models_dir)
        .context("persisting auxiliary bundle")?;
    info!(
        artifact = %artifact_path.display(),
        auxiliary = %auxiliary_path.display(),
        "bundle persisted"
    );

    Ok(TrainingReport {
        summary,
        split_hash,
        train_len,
        test_len,
        ranking,
        best_model,
        artifact_path,
        auxiliary_path,
    })
}
