//! Request rejection and failure types for the HTTP API.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use data_loader::DataError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("user_id must be between 1 and 943")]
    UserIdOutOfRange,

    #[error("n_recommendations must be between 1 and 50")]
    CountOutOfRange,

    #[error("{0}")]
    BadRequest(String),

    #[error("internal server error")]
    Internal(#[from] DataError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Internal(cause) => {
                // Details stay in the log, the client gets a generic 500
                error!(%cause, "recommendation request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
