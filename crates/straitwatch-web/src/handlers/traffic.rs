//! Maritime and air traffic passthrough.

use axum::{extract::State, Json};
use straitwatch_traffic::{TrafficProvider, TrafficSnapshot};
use tracing::error;

use crate::error::ApiError;
use crate::state::SharedState;

/// GET /maritime_traffic
pub async fn maritime_traffic(
    State(state): State<SharedState>,
) -> Result<Json<TrafficSnapshot>, ApiError> {
    relay(state.maritime.as_ref()).await
}

/// GET /air_traffic
pub async fn air_traffic(
    State(state): State<SharedState>,
) -> Result<Json<TrafficSnapshot>, ApiError> {
    relay(state.air.as_ref()).await
}

async fn relay(provider: &dyn TrafficProvider) -> Result<Json<TrafficSnapshot>, ApiError> {
    let feed = provider.feed();
    provider.fetch().await.map(Json).map_err(|e| {
        error!(feed = feed.name(), timeout = e.is_timeout(), "Failed to fetch traffic data: {}", e);
        ApiError::Upstream(feed)
    })
}
