//! # Data Loader Crate
//!
//! Loads the MovieLens 100k dataset into typed, in-memory tables.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Rating, Movie, MovieCatalog, Dataset)
//! - **parser**: Parse `u.data` / `u.item` into Rust structs
//! - **error**: The `DataError` taxonomy shared by the whole pipeline
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Dataset;
//! use std::path::Path;
//!
//! let dataset = Dataset::load_from_dir(Path::new("data/ml-100k"))?;
//! println!(
//!     "{} ratings over {} movies, global mean {:.3}",
//!     dataset.ratings.len(),
//!     dataset.movies.len(),
//!     dataset.global_mean(),
//! );
//! ```

pub mod error;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DataError, Result};
pub use types::{mean_rating, Dataset, ItemId, Movie, MovieCatalog, Rating, UserId};

use std::path::Path;

impl Dataset {
    /// Load `u.data` and `u.item` from a dataset directory.
    ///
    /// The two files are independent, so they are parsed in parallel.
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        let ratings_path = data_dir.join("u.data");
        let movies_path = data_dir.join("u.item");

        let (ratings, movies) = rayon::join(
            || parser::parse_ratings(&ratings_path),
            || parser::parse_movies(&movies_path),
        );

        Ok(Self {
            ratings: ratings?,
            movies: MovieCatalog::from_movies(movies?),
        })
    }
}
