//! Liveness and loaded-artifact report.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::SharedState;

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "models": state.models.summary(),
        "database": state.store.path().display().to_string(),
    }))
}
