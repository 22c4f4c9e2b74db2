//! A/B experiment analysis for the recommender rollout.
//!
//! Loads a conversion log (one row per user with an experiment arm and a
//! 0/1 conversion flag), tallies per-arm statistics, and runs a two-tailed
//! two-proportion z-test on the conversion rate difference.

pub mod data;
pub mod error;
pub mod ztest;

pub use data::{load_observations, read_observations, Group, GroupStats, Observation};
pub use error::{AbTestError, Result};
pub use ztest::{two_proportion_z_test, z_test_from_stats, ZTestResult, ALPHA, Z_CRITICAL};
