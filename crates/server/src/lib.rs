//! HTTP serving shim for the trained recommender.
//!
//! Loads the persisted model bundle once at startup and serves it behind
//! three endpoints. The engine is read-only, so a single instance is shared
//! across connections without locking.

pub mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::{
    AppState, RecommendRequest, RecommendResponse, build_router, N_RECOMMENDATIONS_MAX,
    N_RECOMMENDATIONS_MIN, USER_ID_MAX, USER_ID_MIN,
};

use anyhow::{Context, Result};
use engine::{RecommendationEngine, find_model_name};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Load the persisted bundle and serve it on `addr` until shutdown.
pub async fn run(addr: &str, models_dir: &Path) -> Result<()> {
    let model_name = find_model_name(models_dir)
        .with_context(|| format!("locating a persisted model in {}", models_dir.display()))?;
    let engine = RecommendationEngine::load(models_dir, &model_name)
        .with_context(|| format!("loading model bundle '{model_name}'"))?;
    info!(model = %model_name, "model bundle loaded");

    let router = build_router(Arc::new(AppState { engine }));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "recommendation API listening");
    axum::serve(listener, router).await.context("serving HTTP")?;
    Ok(())
}
