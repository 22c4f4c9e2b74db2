//! Error types for dataset loading and persisted-table lookups.
//!
//! Everything here is fatal: a missing file, an unparseable row, or a
//! lookup key that should exist in a persisted table means the run cannot
//! continue. Nothing is retried, the loader is deterministic.

use thiserror::Error;

/// Errors raised while reading the dataset or resolving keys in loaded
/// tables.
#[derive(Error, Debug)]
pub enum DataError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Line in a data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// A key that must exist in a loaded table was absent
    /// (e.g. a recommended item with no title in the movie table)
    #[error("Missing key: {entity} with id {id}")]
    MissingKey { entity: String, id: u32 },

    /// Persisted bundle could not be serialized or deserialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataError>;
