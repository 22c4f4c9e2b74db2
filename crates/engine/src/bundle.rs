//! Persistence of the winning model and its auxiliary data.
//!
//! The training run writes two separately addressable units into a models
//! directory:
//!
//! - `model_<name>.json`: the winning [`Artifact`], keyed by model name
//! - `auxiliary.json`: the shared lookup bundle of movie table, full
//!   ratings table, user-item matrix, and the training split
//!
//! Either unit can be reloaded on its own; the inference path needs both
//! and loads them once at startup, read-only.

use data_loader::{DataError, MovieCatalog, Rating, Result};
use models::{Artifact, UserItemMatrix};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the shared auxiliary bundle.
pub const AUXILIARY_FILE: &str = "auxiliary.json";

/// Path of the persisted artifact for a given model name.
pub fn model_path(models_dir: &Path, model_name: &str) -> PathBuf {
    models_dir.join(format!("model_{model_name}.json"))
}

/// Lookup tables the recommendation engine needs besides the artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuxiliaryData {
    pub movies: MovieCatalog,
    pub ratings: Vec<Rating>,
    pub matrix: UserItemMatrix,
    pub train: Vec<Rating>,
}

/// A fully loaded model bundle: artifact plus auxiliary tables.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    pub artifact: Artifact,
    pub auxiliary: AuxiliaryData,
}

/// Persist the winning artifact under its model name.
pub fn save_artifact(models_dir: &Path, artifact: &Artifact) -> Result<PathBuf> {
    std::fs::create_dir_all(models_dir)?;
    let path = model_path(models_dir, artifact.name());
    let file = BufWriter::new(File::create(&path)?);
    serde_json::to_writer(file, artifact)?;
    info!(path = %path.display(), "model artifact persisted");
    Ok(path)
}

/// Find the persisted model name by scanning for `model_<name>.json`.
///
/// The training pipeline persists exactly one winner, so the first match
/// (in lexicographic order, for determinism) is returned.
pub fn find_model_name(models_dir: &Path) -> Result<String> {
    let entries = std::fs::read_dir(models_dir).map_err(|_| DataError::FileNotFound {
        path: models_dir.display().to_string(),
    })?;
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let file_name = entry.file_name().into_string().ok()?;
            let name = file_name.strip_prefix("model_")?.strip_suffix(".json")?;
            Some(name.to_string())
        })
        .collect();
    names.sort();
    names.into_iter().next().ok_or_else(|| DataError::FileNotFound {
        path: model_path(models_dir, "*").display().to_string(),
    })
}

/// Load a persisted artifact by model name.
pub fn load_artifact(models_dir: &Path, model_name: &str) -> Result<Artifact> {
    let path = model_path(models_dir, model_name);
    let file = File::open(&path).map_err(|_| DataError::FileNotFound {
        path: path.display().to_string(),
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

impl AuxiliaryData {
    pub fn save(&self, models_dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(models_dir)?;
        let path = models_dir.join(AUXILIARY_FILE);
        let file = BufWriter::new(File::create(&path)?);
        serde_json::to_writer(file, self)?;
        info!(path = %path.display(), "auxiliary bundle persisted");
        Ok(path)
    }

    pub fn load(models_dir: &Path) -> Result<Self> {
        let path = models_dir.join(AUXILIARY_FILE);
        let file = File::open(&path).map_err(|_| DataError::FileNotFound {
            path: path.display().to_string(),
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

impl ModelBundle {
    /// Load both units from a models directory.
    pub fn load(models_dir: &Path, model_name: &str) -> Result<Self> {
        Ok(Self {
            artifact: load_artifact(models_dir, model_name)?,
            auxiliary: AuxiliaryData::load(models_dir)?,
        })
    }
}
