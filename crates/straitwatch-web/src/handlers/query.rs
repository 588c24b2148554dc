//! Raw SQL passthrough endpoint.

use axum::{extract::State, Json};
use serde::Deserialize;
use straitwatch_db::{QueryOutcome, QueryRows};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// POST /query
///
/// Executes the statement verbatim against the store.
pub async fn run_query(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<QueryRequest>,
) -> Result<Json<QueryRows>, ApiError> {
    match state.store.execute_query(&request.query).await {
        QueryOutcome::Rows(rows) => Ok(Json(rows)),
        QueryOutcome::Error { error } => Err(ApiError::Store(error)),
    }
}
