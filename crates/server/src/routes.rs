//! HTTP routes for the recommendation API.
//!
//! Three endpoints, mirroring the serving contract:
//! - `GET /` describes the API
//! - `GET /health` reports liveness and the loaded model
//! - `POST /recommend` returns top-N recommendations for a user

use crate::error::ApiError;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use engine::{Recommendation, RecommendationEngine};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

/// Valid user id range for the MovieLens 100k dataset.
pub const USER_ID_MIN: u32 = 1;
pub const USER_ID_MAX: u32 = 943;

/// Valid recommendation count range.
pub const N_RECOMMENDATIONS_MIN: usize = 1;
pub const N_RECOMMENDATIONS_MAX: usize = 50;

const DEFAULT_N_RECOMMENDATIONS: usize = 5;

/// Shared read-only state behind the handlers.
pub struct AppState {
    pub engine: RecommendationEngine,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub user_id: u32,
    #[serde(default = "default_n_recommendations")]
    pub n_recommendations: usize,
}

fn default_n_recommendations() -> usize {
    DEFAULT_N_RECOMMENDATIONS
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub user_id: u32,
    pub n_recommendations: usize,
    pub total_recommendations: usize,
    pub recommendations: Vec<Recommendation>,
}

/// Build the application router over shared engine state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(api_info))
        .route("/health", get(health))
        .route("/recommend", post(recommend))
        .with_state(state)
}

async fn api_info() -> Json<Value> {
    Json(json!({
        "message": "Movie Recommendation API - MovieLens 100k",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/": "GET - API information",
            "/health": "GET - liveness and loaded model",
            "/recommend": "POST - top-N movie recommendations",
        },
        "example": {
            "url": "/recommend",
            "method": "POST",
            "body": { "user_id": 1, "n_recommendations": 5 },
        },
    }))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "model_loaded": true,
        "model": state.engine.model_name(),
    }))
}

async fn recommend(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    if request.user_id < USER_ID_MIN || request.user_id > USER_ID_MAX {
        return Err(ApiError::UserIdOutOfRange);
    }
    if request.n_recommendations < N_RECOMMENDATIONS_MIN
        || request.n_recommendations > N_RECOMMENDATIONS_MAX
    {
        return Err(ApiError::CountOutOfRange);
    }

    let recommendations = state
        .engine
        .recommend(request.user_id, request.n_recommendations)?;
    info!(
        user_id = request.user_id,
        requested = request.n_recommendations,
        returned = recommendations.len(),
        "served recommendations"
    );

    Ok(Json(RecommendResponse {
        user_id: request.user_id,
        n_recommendations: request.n_recommendations,
        total_recommendations: recommendations.len(),
        recommendations,
    }))
}
