//! Process-wide artifact set, loaded once before the server accepts requests.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::classifier::ClassifierPipeline;
use crate::error::{ModelError, Result};
use crate::records::{HousingRecord, TitanicRecord, TITANIC_FEATURES};
use crate::regressor::Regressor;
use crate::scaler::StandardScaler;

/// Where the three artifacts live on disk.
#[derive(Debug, Clone)]
pub struct ModelPaths {
    pub titanic: PathBuf,
    pub housing_scaler: PathBuf,
    pub housing_model: PathBuf,
}

/// The fitted artifacts. Immutable after construction.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    titanic: ClassifierPipeline,
    housing_scaler: StandardScaler,
    housing_model: Regressor,
}

/// What `/health` reports about the loaded artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub titanic_classifier: &'static str,
    pub titanic_trees: usize,
    pub housing_regressor: &'static str,
    pub housing_trees: usize,
    pub housing_features: Vec<String>,
}

impl ModelRegistry {
    /// Read and validate every artifact. Any failure aborts the load.
    pub fn load(paths: &ModelPaths) -> Result<Self> {
        let titanic: ClassifierPipeline = read_artifact(&paths.titanic)?;
        let housing_scaler: StandardScaler = read_artifact(&paths.housing_scaler)?;
        let housing_model: Regressor = read_artifact(&paths.housing_model)?;

        let registry = Self::from_parts(titanic, housing_scaler, housing_model)?;
        info!(
            titanic = registry.titanic.classifier.kind(),
            housing = registry.housing_model.kind(),
            housing_trees = registry.housing_model.trees().len(),
            "Model artifacts loaded"
        );
        Ok(registry)
    }

    pub fn from_parts(
        titanic: ClassifierPipeline,
        housing_scaler: StandardScaler,
        housing_model: Regressor,
    ) -> Result<Self> {
        titanic.validate()?;
        if titanic.feature_names.iter().map(String::as_str).ne(TITANIC_FEATURES) {
            return Err(ModelError::Malformed(format!(
                "titanic pipeline features {:?} do not match {:?}",
                titanic.feature_names, TITANIC_FEATURES
            )));
        }

        housing_scaler.validate()?;
        if housing_scaler.feature_names.is_empty() {
            return Err(ModelError::Malformed(
                "housing scaler must name its features".to_string(),
            ));
        }
        housing_model.validate(housing_scaler.width())?;

        Ok(Self { titanic, housing_scaler, housing_model })
    }

    /// Survival class for one passenger, `0` or `1`.
    pub fn predict_survival(&self, record: &TitanicRecord) -> Result<u8> {
        self.titanic.predict(&record.to_row())
    }

    /// Scale the housing features, then run the ensemble.
    pub fn predict_price(&self, record: &HousingRecord) -> Result<f64> {
        let row = record.arrange(&self.housing_scaler.feature_names)?;
        let scaled = self.housing_scaler.transform(&row)?;
        self.housing_model.predict(&scaled)
    }

    pub fn housing_features(&self) -> &[String] {
        &self.housing_scaler.feature_names
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            titanic_classifier: self.titanic.classifier.kind(),
            titanic_trees: self.titanic.classifier.n_trees(),
            housing_regressor: self.housing_model.kind(),
            housing_trees: self.housing_model.trees().len(),
            housing_features: self.housing_scaler.feature_names.clone(),
        }
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read(path).map_err(|source| ModelError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_slice(&raw).map_err(|source| ModelError::Parse {
        path: path.display().to_string(),
        source,
    })
}
