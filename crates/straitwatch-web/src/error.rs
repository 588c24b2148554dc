//! Mapping from gateway failures to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use straitwatch_models::ModelError;
use straitwatch_traffic::TrafficFeed;
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    /// Payload is well-formed JSON but does not fit the model schema.
    Validation(String),
    /// Structured store error, surfaced with its message.
    Store(String),
    /// Upstream provider failed; the caller only sees a fixed message.
    Upstream(TrafficFeed),
    /// Inference fault. Logged, never described to the caller.
    Inference(ModelError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(detail) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": detail }))).into_response()
            }
            ApiError::Store(detail) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "detail": detail }))).into_response()
            }
            ApiError::Upstream(feed) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": feed.failure_detail() })),
            )
                .into_response(),
            ApiError::Inference(e) => {
                error!("Inference failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        if err.is_input_error() {
            ApiError::Validation(err.to_string())
        } else {
            ApiError::Inference(err)
        }
    }
}
