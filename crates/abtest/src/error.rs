//! Errors raised while loading or analyzing A/B experiment data.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AbTestError {
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("converted flag for user {user_id} must be 0 or 1, got {value}")]
    InvalidConverted { user_id: u32, value: u8 },

    #[error("no observations in the {group} group")]
    EmptyGroup { group: &'static str },

    #[error("conversion rates are degenerate, the z statistic is undefined")]
    ZeroVariance,
}

pub type Result<T> = std::result::Result<T, AbTestError>;
