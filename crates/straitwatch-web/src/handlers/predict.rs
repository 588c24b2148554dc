//! Model inference endpoints.

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};
use straitwatch_models::{HousingRecord, TitanicRecord};
use tracing::debug;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::SharedState;

pub const SLOWDOWN_PLACEHOLDER: &str = "Prediction endpoint placeholder";

#[derive(Debug, Serialize)]
pub struct SurvivalResponse {
    #[serde(rename = "Survived")]
    pub survived: u8,
}

#[derive(Debug, Serialize)]
pub struct PriceResponse {
    pub price: f64,
}

/// POST /predict_titanic
pub async fn predict_titanic(
    State(state): State<SharedState>,
    ApiJson(record): ApiJson<TitanicRecord>,
) -> Result<Json<SurvivalResponse>, ApiError> {
    let survived = state.models.predict_survival(&record)?;
    debug!(?record, survived, "Titanic prediction");
    Ok(Json(SurvivalResponse { survived }))
}

/// POST /predict_housing
pub async fn predict_housing(
    State(state): State<SharedState>,
    ApiJson(record): ApiJson<HousingRecord>,
) -> Result<Json<PriceResponse>, ApiError> {
    let price = state.models.predict_price(&record)?;
    debug!(price, "Housing prediction");
    Ok(Json(PriceResponse { price }))
}

/// GET|POST /predict_traffic_slowdown
///
/// Stub until a slowdown model exists.
/// Any request body is ignored.
pub async fn predict_traffic_slowdown() -> Json<Value> {
    Json(json!({ "message": SLOWDOWN_PLACEHOLDER }))
}
