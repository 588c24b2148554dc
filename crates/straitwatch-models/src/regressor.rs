//! Tree-ensemble regressors.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::tree::DecisionTree;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Regressor {
    /// Bagged forest: mean of the tree outputs.
    Forest { trees: Vec<DecisionTree> },
    /// Gradient boosting: `base_score + learning_rate * Σ tree outputs`.
    Boosted {
        #[serde(default)]
        base_score: f64,
        #[serde(default = "default_learning_rate")]
        learning_rate: f64,
        trees: Vec<DecisionTree>,
    },
}

fn default_learning_rate() -> f64 { 1.0 }

impl Regressor {
    pub fn kind(&self) -> &'static str {
        match self {
            Regressor::Forest { .. } => "forest",
            Regressor::Boosted { .. } => "boosted",
        }
    }

    pub fn trees(&self) -> &[DecisionTree] {
        match self {
            Regressor::Forest { trees } | Regressor::Boosted { trees, .. } => trees,
        }
    }

    pub fn validate(&self, width: usize) -> Result<()> {
        let trees = self.trees();
        if trees.is_empty() {
            return Err(ModelError::Malformed(format!("{} ensemble has no trees", self.kind())));
        }
        if let Regressor::Boosted { base_score, learning_rate, .. } = self {
            if !base_score.is_finite() || !learning_rate.is_finite() {
                return Err(ModelError::Malformed(
                    "boosted ensemble has non-finite parameters".to_string(),
                ));
            }
        }
        for tree in trees {
            tree.validate(width)?;
        }
        Ok(())
    }

    /// Predict one row. Non-finite outputs are reported as errors.
    pub fn predict(&self, row: &[f64]) -> Result<f64> {
        let mut sum = 0.0;
        for tree in self.trees() {
            sum += tree.predict(row)?;
        }
        let value = match self {
            Regressor::Forest { trees } => sum / trees.len() as f64,
            Regressor::Boosted { base_score, learning_rate, .. } => base_score + learning_rate * sum,
        };
        if !value.is_finite() {
            return Err(ModelError::NonFinite(value));
        }
        Ok(value)
    }
}
