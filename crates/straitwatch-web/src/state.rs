//! Shared application state for the web server.

use std::sync::Arc;
use straitwatch_common::Config;
use straitwatch_db::QueryStore;
use straitwatch_models::{ModelPaths, ModelRegistry};
use straitwatch_traffic::{HttpTrafficProvider, TrafficFeed, TrafficProvider};
use tracing::info;

/// Shared state injected into every Axum handler.
///
/// Built once before the listener is bound and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub models: Arc<ModelRegistry>,
    pub store: QueryStore,
    pub maritime: Arc<dyn TrafficProvider>,
    pub air: Arc<dyn TrafficProvider>,
}

impl AppState {
    pub fn new(
        models: ModelRegistry,
        store: QueryStore,
        maritime: Arc<dyn TrafficProvider>,
        air: Arc<dyn TrafficProvider>,
    ) -> Self {
        Self { models: Arc::new(models), store, maritime, air }
    }

    /// Load the artifacts and build the provider clients. Any failure here
    /// must stop the process before it serves a request.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let models = ModelRegistry::load(&ModelPaths {
            titanic: config.models.titanic.clone(),
            housing_scaler: config.models.housing_scaler.clone(),
            housing_model: config.models.housing_model.clone(),
        })?;

        let timeout = config.provider_timeout();
        let maritime = HttpTrafficProvider::from_config(
            TrafficFeed::Maritime,
            &config.providers.maritime,
            timeout,
        )?;
        let air = HttpTrafficProvider::from_config(TrafficFeed::Air, &config.providers.air, timeout)?;

        // Create the store's directory if it doesn't exist
        if let Some(parent) = config.database.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
                info!("Created store directory {}", parent.display());
            }
        }

        Ok(Self::new(
            models,
            QueryStore::new(config.database.path.clone()),
            Arc::new(maritime),
            Arc::new(air),
        ))
    }
}

pub type SharedState = Arc<AppState>;
