//! One-shot training pipeline for the recommender.
//!
//! This crate wires the data loader and the model trainers into a single
//! pass: load the MovieLens tables, split, build the user-item matrix, fit
//! and evaluate all five baselines, rank them by held-out RMSE, and persist
//! the winner together with the auxiliary bundle the serving side needs.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::run_training;
//!
//! let report = run_training(Path::new("data/ml-100k"), Path::new("models"))?;
//! println!("best model: {}", report.best_model);
//! ```

pub mod report;
pub mod train;

pub use report::{DatasetSummary, TrainingReport};
pub use train::run_training;
