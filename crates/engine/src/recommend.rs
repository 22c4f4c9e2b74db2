//! The recommendation engine: score unrated movies for a user with a
//! loaded model bundle and return the top N with titles.
//!
//! All state is read-only after construction, so one engine instance can
//! be shared across concurrent callers behind an `Arc` without locking.

use crate::bundle::ModelBundle;
use data_loader::{mean_rating, DataError, ItemId, Result, UserId};
use models::PredictContext;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, instrument};

/// One ranked recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub item_id: ItemId,
    pub title: String,
    pub predicted_rating: f64,
}

/// Read-only inference engine over a persisted bundle.
pub struct RecommendationEngine {
    bundle: ModelBundle,
    /// Items each user rated in the training split; these are never
    /// recommended back.
    rated_by_user: HashMap<UserId, HashSet<ItemId>>,
    global_mean: f64,
}

impl RecommendationEngine {
    pub fn new(bundle: ModelBundle) -> Self {
        let mut rated_by_user: HashMap<UserId, HashSet<ItemId>> = HashMap::new();
        for r in &bundle.auxiliary.train {
            rated_by_user.entry(r.user_id).or_default().insert(r.item_id);
        }
        let global_mean = mean_rating(&bundle.auxiliary.train);
        Self {
            bundle,
            rated_by_user,
            global_mean,
        }
    }

    /// Load the persisted bundle for `model_name` and build an engine.
    pub fn load(models_dir: &Path, model_name: &str) -> Result<Self> {
        Ok(Self::new(ModelBundle::load(models_dir, model_name)?))
    }

    /// Name of the loaded model variant.
    pub fn model_name(&self) -> &'static str {
        self.bundle.artifact.name()
    }

    /// Top `n` recommendations for a user.
    ///
    /// Candidates are every movie in the catalog the user has not rated
    /// in training, enumerated in ascending item id. Scoring uses the
    /// loaded artifact's prediction rule; the final order is predicted
    /// rating descending, with ties keeping the ascending-id enumeration
    /// order (the sort is stable).
    ///
    /// A user with no training ratings is not an error: nothing is
    /// excluded and the scores degenerate to the model's item-level
    /// behavior (for popularity, the per-item means).
    #[instrument(skip(self))]
    pub fn recommend(&self, user_id: UserId, n: usize) -> Result<Vec<Recommendation>> {
        let no_history = HashSet::new();
        let rated = self.rated_by_user.get(&user_id).unwrap_or(&no_history);

        let ctx = PredictContext {
            matrix: &self.bundle.auxiliary.matrix,
            global_mean: self.global_mean,
        };

        let mut scored: Vec<(ItemId, f64)> = self
            .bundle
            .auxiliary
            .movies
            .item_ids()
            .filter(|item_id| !rated.contains(item_id))
            .map(|item_id| (item_id, self.bundle.artifact.predict(&ctx, user_id, item_id)))
            .collect();

        // Stable sort: equal scores keep ascending item_id order
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(n);

        debug!(
            user_id,
            excluded = rated.len(),
            returned = scored.len(),
            "scored recommendation candidates"
        );

        scored
            .into_iter()
            .map(|(item_id, predicted_rating)| {
                let title = self
                    .bundle
                    .auxiliary
                    .movies
                    .title(item_id)
                    .ok_or(DataError::MissingKey {
                        entity: "movie title".to_string(),
                        id: item_id,
                    })?
                    .to_string();
                Ok(Recommendation {
                    item_id,
                    title,
                    predicted_rating,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::AuxiliaryData;
    use data_loader::{Movie, MovieCatalog, Rating};
    use models::{Artifact, UserItemMatrix};
    use std::collections::BTreeMap;

    fn rating(user_id: UserId, item_id: ItemId, value: u8) -> Rating {
        Rating {
            user_id,
            item_id,
            rating: value,
            timestamp: 0,
        }
    }

    fn catalog(ids: &[ItemId]) -> MovieCatalog {
        let mut movies = MovieCatalog::new();
        for &id in ids {
            movies.insert(Movie {
                id,
                title: format!("Movie {id} (1995)"),
            });
        }
        movies
    }

    /// User 1 has rated items 10, 20, 30; the pool also has 40..=70.
    fn popularity_engine() -> RecommendationEngine {
        let train = vec![
            rating(1, 10, 5),
            rating(1, 20, 4),
            rating(1, 30, 3),
            rating(2, 40, 5),
            rating(2, 50, 4),
            rating(2, 60, 2),
        ];
        let auxiliary = AuxiliaryData {
            movies: catalog(&[10, 20, 30, 40, 50, 60, 70]),
            ratings: train.clone(),
            matrix: UserItemMatrix::from_ratings(&train),
            train,
        };
        let artifact = Artifact::Popularity {
            item_means: BTreeMap::from([
                (10, 5.0),
                (20, 4.0),
                (30, 3.0),
                (40, 5.0),
                (50, 4.0),
                (60, 2.0),
            ]),
            global_mean: 23.0 / 6.0,
        };
        RecommendationEngine::new(ModelBundle {
            artifact,
            auxiliary,
        })
    }

    #[test]
    fn never_recommends_items_the_user_already_rated() {
        let engine = popularity_engine();
        let recs = engine.recommend(1, 10).unwrap();
        for rec in &recs {
            assert!(![10, 20, 30].contains(&rec.item_id), "item {} was rated", rec.item_id);
        }
        // 4 unrated candidates exist
        assert_eq!(recs.len(), 4);
    }

    #[test]
    fn top_n_is_highest_scored_first() {
        let engine = popularity_engine();
        let recs = engine.recommend(1, 2).unwrap();
        assert_eq!(recs.len(), 2);
        // Item 40 has mean 5.0, item 50 has 4.0
        assert_eq!(recs[0].item_id, 40);
        assert_eq!(recs[1].item_id, 50);
        assert!(recs[0].predicted_rating >= recs[1].predicted_rating);
        assert_eq!(recs[0].title, "Movie 40 (1995)");
    }

    #[test]
    fn equal_scores_keep_ascending_item_id_order() {
        let train = vec![rating(1, 10, 3)];
        let auxiliary = AuxiliaryData {
            movies: catalog(&[10, 20, 30, 40]),
            ratings: train.clone(),
            matrix: UserItemMatrix::from_ratings(&train),
            train,
        };
        // Every candidate scores the same (global mean)
        let engine = RecommendationEngine::new(ModelBundle {
            artifact: Artifact::Random,
            auxiliary,
        });

        let recs = engine.recommend(1, 3).unwrap();
        let ids: Vec<ItemId> = recs.iter().map(|r| r.item_id).collect();
        assert_eq!(ids, vec![20, 30, 40]);
    }

    #[test]
    fn result_length_is_min_of_n_and_unrated_pool() {
        let engine = popularity_engine();
        assert_eq!(engine.recommend(1, 2).unwrap().len(), 2);
        assert_eq!(engine.recommend(1, 50).unwrap().len(), 4);
    }

    #[test]
    fn unknown_user_degenerates_to_item_level_ranking() {
        let engine = popularity_engine();
        let recs = engine.recommend(999, 7).unwrap();
        // Nothing excluded: the whole catalog is eligible
        assert_eq!(recs.len(), 7);
        // Ties at mean 5.0 resolve by ascending item id: 10 before 40
        assert_eq!(recs[0].item_id, 10);
        assert_eq!(recs[1].item_id, 40);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let engine = popularity_engine();
        let first = engine.recommend(1, 4).unwrap();
        let second = engine.recommend(1, 4).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn candidates_come_only_from_the_catalog() {
        let train = vec![rating(1, 10, 4), rating(2, 20, 5)];
        let auxiliary = AuxiliaryData {
            // Catalog only knows item 10; item 20 exists in ratings only
            movies: catalog(&[10]),
            ratings: train.clone(),
            matrix: UserItemMatrix::from_ratings(&train),
            train,
        };
        let engine = RecommendationEngine::new(ModelBundle {
            artifact: Artifact::Random,
            auxiliary,
        });

        // User 2 rated 20 but candidates come from the catalog, so this
        // succeeds; a corrupt catalog shows up as MissingKey instead.
        let ok = engine.recommend(2, 5).unwrap();
        assert_eq!(ok.len(), 1);
        assert_eq!(ok[0].item_id, 10);
    }
}
