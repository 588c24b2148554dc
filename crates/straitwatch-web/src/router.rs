//! Axum router. Maps all URL paths to handlers.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    predict::{predict_titanic, predict_housing, predict_traffic_slowdown},
    query::run_query,
    traffic::{maritime_traffic, air_traffic},
    system::health,
};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Inference
        .route("/predict_titanic",          post(predict_titanic))
        .route("/predict_housing",          post(predict_housing))
        .route("/predict_traffic_slowdown", get(predict_traffic_slowdown).post(predict_traffic_slowdown))

        // Store passthrough
        .route("/query",                    post(run_query))

        // Upstream passthrough
        .route("/maritime_traffic",         get(maritime_traffic))
        .route("/air_traffic",              get(air_traffic))

        .route("/health",                   get(health))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
