//! Serving-side surface of the recommender.
//!
//! [`bundle`] persists trained artifacts and the auxiliary data they need at
//! inference time, and [`recommend`] turns a loaded bundle into ranked top-N
//! movie lists.

pub mod bundle;
pub mod recommend;

pub use bundle::{
    find_model_name, load_artifact, model_path, save_artifact, AuxiliaryData, ModelBundle,
    AUXILIARY_FILE,
};
pub use recommend::{Recommendation, RecommendationEngine};
