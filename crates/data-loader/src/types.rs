//! Core domain types for the MovieLens 100k dataset.
//!
//! Two tables feed the whole pipeline: the rating table (`u.data`) and the
//! movie table (`u.item`). Both are immutable once loaded.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user IDs with item IDs

/// Unique identifier for a user (1-943 in MovieLens 100k)
pub type UserId = u32;

/// Unique identifier for a movie (1-1682 in MovieLens 100k)
pub type ItemId = u32;

// =============================================================================
// Rating
// =============================================================================

/// A single rating from a user for a movie.
///
/// The dataset does not enforce uniqueness, but we assume one rating per
/// (user, item) pair as the source data provides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub item_id: ItemId,
    /// Rating value, an integer from 1 to 5
    pub rating: u8,
    /// Unix timestamp when the rating was made
    pub timestamp: i64,
}

// =============================================================================
// Movie
// =============================================================================

/// A movie from the `u.item` table.
///
/// The raw file carries release dates, an IMDb URL and 19 genre flags; the
/// pipeline only needs the id and title, so the rest is dropped at parse
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: ItemId,
    pub title: String,
}

/// Read-only movie lookup table.
///
/// Backed by a `BTreeMap` so iteration is always in ascending item id
/// order; the recommendation engine relies on that as its candidate
/// enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieCatalog {
    movies: BTreeMap<ItemId, Movie>,
}

impl MovieCatalog {
    pub fn new() -> Self {
        Self {
            movies: BTreeMap::new(),
        }
    }

    pub fn from_movies(movies: Vec<Movie>) -> Self {
        Self {
            movies: movies.into_iter().map(|m| (m.id, m)).collect(),
        }
    }

    pub fn get(&self, id: ItemId) -> Option<&Movie> {
        self.movies.get(&id)
    }

    pub fn title(&self, id: ItemId) -> Option<&str> {
        self.movies.get(&id).map(|m| m.title.as_str())
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.movies.contains_key(&id)
    }

    /// All item ids, ascending.
    pub fn item_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.movies.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Movie> {
        self.movies.values()
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn insert(&mut self, movie: Movie) {
        self.movies.insert(movie.id, movie);
    }
}

// =============================================================================
// Dataset
// =============================================================================

/// The loaded dataset: all ratings plus the movie table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub ratings: Vec<Rating>,
    pub movies: MovieCatalog,
}

impl Dataset {
    /// Mean rating over the whole table. Returns 0.0 for an empty table.
    pub fn global_mean(&self) -> f64 {
        mean_rating(&self.ratings)
    }

    /// Fraction of (user, item) pairs with no observed rating.
    pub fn sparsity(&self) -> f64 {
        let users: std::collections::HashSet<UserId> =
            self.ratings.iter().map(|r| r.user_id).collect();
        let cells = users.len() as f64 * self.movies.len() as f64;
        if cells == 0.0 {
            return 0.0;
        }
        1.0 - self.ratings.len() as f64 / cells
    }
}

/// Mean of a slice of ratings. Returns 0.0 for an empty slice.
pub fn mean_rating(ratings: &[Rating]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let total: f64 = ratings.iter().map(|r| r.rating as f64).sum();
    total / ratings.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(user_id: UserId, item_id: ItemId, rating: u8) -> Rating {
        Rating {
            user_id,
            item_id,
            rating,
            timestamp: 0,
        }
    }

    #[test]
    fn catalog_iterates_in_ascending_item_id_order() {
        let catalog = MovieCatalog::from_movies(vec![
            Movie {
                id: 30,
                title: "C".to_string(),
            },
            Movie {
                id: 10,
                title: "A".to_string(),
            },
            Movie {
                id: 20,
                title: "B".to_string(),
            },
        ]);

        let ids: Vec<ItemId> = catalog.item_ids().collect();
        assert_eq!(ids, vec![10, 20, 30]);
        assert_eq!(catalog.title(20), Some("B"));
        assert_eq!(catalog.title(99), None);
    }

    #[test]
    fn global_mean_over_all_ratings() {
        let dataset = Dataset {
            ratings: vec![rating(1, 1, 2), rating(1, 2, 4), rating(2, 1, 3)],
            movies: MovieCatalog::new(),
        };
        assert!((dataset.global_mean() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn mean_rating_of_empty_slice_is_zero() {
        assert_eq!(mean_rating(&[]), 0.0);
    }

    #[test]
    fn sparsity_counts_missing_cells() {
        let mut movies = MovieCatalog::new();
        movies.insert(Movie {
            id: 1,
            title: "A".to_string(),
        });
        movies.insert(Movie {
            id: 2,
            title: "B".to_string(),
        });
        let dataset = Dataset {
            // 2 users x 2 movies, 2 observed ratings -> sparsity 0.5
            ratings: vec![rating(1, 1, 5), rating(2, 2, 3)],
            movies,
        };
        assert!((dataset.sparsity() - 0.5).abs() < 1e-12);
    }
}
