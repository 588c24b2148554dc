//! Standardisation transform fitted offline (per-feature mean and scale).

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Per-feature standardisation: `(x - mean) / scale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Feature names seen at fit time, in column order. Optional for scalers
    /// embedded in a pipeline that already names its inputs.
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self { feature_names: Vec::new(), mean, scale }
    }

    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = names;
        self
    }

    /// Number of input columns the scaler expects.
    pub fn width(&self) -> usize {
        self.mean.len()
    }

    pub fn validate(&self) -> Result<()> {
        if self.mean.is_empty() {
            return Err(ModelError::Malformed("scaler has no features".to_string()));
        }
        if self.mean.len() != self.scale.len() {
            return Err(ModelError::Malformed(format!(
                "scaler mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if !self.feature_names.is_empty() && self.feature_names.len() != self.mean.len() {
            return Err(ModelError::Malformed(format!(
                "scaler names {} features but has {} columns",
                self.feature_names.len(),
                self.mean.len()
            )));
        }
        Ok(())
    }

    /// Standardise one row. A zero scale leaves the centred value unscaled.
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.width() {
            return Err(ModelError::WidthMismatch {
                expected: self.width(),
                actual: row.len(),
            });
        }
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&x, (&mean, &scale))| {
                let scale = if scale == 0.0 { 1.0 } else { scale };
                (x - mean) / scale
            })
            .collect())
    }
}
