//! # Models Crate
//!
//! The algorithmic core of the recommender: the train/test split, the
//! user-item matrix, five baseline models with a shared evaluation loop,
//! and the comparator that picks the winner.
//!
//! ## Components
//!
//! - **split**: seeded, reproducible 80/20 partition of the ratings
//! - **matrix**: dense user-item matrix (0.0 = missing) and a small
//!   row-major matrix type the numeric code shares
//! - **similarity**: pairwise cosine similarity (rayon-parallel)
//! - **svd**: seeded randomized truncated SVD
//! - **metrics**: RMSE / MAE
//! - **artifact**: the tagged model variant with one `predict` dispatch
//! - **trainers**: fit + evaluate for all five baselines
//! - **compare**: stable min-RMSE ranking
//!
//! ## Example Usage
//!
//! ```ignore
//! use models::{split::train_test_split, matrix::UserItemMatrix, trainers};
//!
//! let split = train_test_split(&dataset.ratings, 0.2, 42);
//! let matrix = UserItemMatrix::from_ratings(&split.train);
//! let trained = trainers::fit_all(&split, &matrix);
//! ```

pub mod artifact;
pub mod compare;
pub mod matrix;
pub mod metrics;
pub mod similarity;
pub mod split;
pub mod svd;
pub mod trainers;

// Re-export commonly used types
pub use artifact::{Artifact, PredictContext, RATING_MAX, RATING_MIN};
pub use compare::{rank_by_rmse, select_best, RankedModel};
pub use matrix::{Dense, UserItemMatrix};
pub use metrics::EvaluationResult;
pub use split::{train_test_split, TrainTestSplit, SPLIT_SEED, TEST_FRACTION};
pub use svd::{SvdFactors, TruncatedSvd, SVD_RANK, SVD_SEED};
pub use trainers::{fit_all, TrainedModel};
