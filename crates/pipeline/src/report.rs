//! Report types returned by a training run.

use data_loader::Dataset;
use models::RankedModel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Headline numbers for a loaded dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub n_ratings: usize,
    pub n_users: usize,
    pub n_movies: usize,
    pub global_mean: f64,
    pub sparsity: f64,
}

impl DatasetSummary {
    pub fn describe(dataset: &Dataset) -> Self {
        let users: BTreeSet<_> = dataset.ratings.iter().map(|r| r.user_id).collect();
        Self {
            n_ratings: dataset.ratings.len(),
            n_users: users.len(),
            n_movies: dataset.movies.len(),
            global_mean: dataset.global_mean(),
            sparsity: dataset.sparsity(),
        }
    }
}

/// Everything a training run produced: the dataset summary, the split
/// fingerprint, all five evaluations ranked by RMSE, and where the winning
/// artifact landed on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub summary: DatasetSummary,
    pub split_hash: u64,
    pub train_len: usize,
    pub test_len: usize,
    pub ranking: Vec<RankedModel>,
    pub best_model: String,
    pub artifact_path: PathBuf,
    pub auxiliary_path: PathBuf,
}

impl TrainingReport {
    /// Evaluation row for the winning model.
    pub fn best(&self) -> Option<&RankedModel> {
        self.ranking.iter().find(|m| m.name == self.best_model)
    }
}
