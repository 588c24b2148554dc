//! Binary classifier pipelines: optional standardisation followed by a
//! logistic model or a probability forest.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::scaler::StandardScaler;
use crate::tree::DecisionTree;

/// Probability at or above which the positive class is predicted.
pub const DECISION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    /// `sigmoid(w·x + b)`
    Logistic { coefficients: Vec<f64>, intercept: f64 },
    /// Mean of per-tree class-1 probabilities.
    Forest { trees: Vec<DecisionTree> },
}

impl Classifier {
    pub fn kind(&self) -> &'static str {
        match self {
            Classifier::Logistic { .. } => "logistic",
            Classifier::Forest { .. } => "forest",
        }
    }

    pub fn n_trees(&self) -> usize {
        match self {
            Classifier::Logistic { .. } => 0,
            Classifier::Forest { trees } => trees.len(),
        }
    }

    pub fn validate(&self, width: usize) -> Result<()> {
        match self {
            Classifier::Logistic { coefficients, intercept } => {
                if coefficients.len() != width {
                    return Err(ModelError::Malformed(format!(
                        "logistic model has {} coefficients for {} features",
                        coefficients.len(),
                        width
                    )));
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(ModelError::Malformed(
                        "logistic model has non-finite parameters".to_string(),
                    ));
                }
            }
            Classifier::Forest { trees } => {
                if trees.is_empty() {
                    return Err(ModelError::Malformed("forest has no trees".to_string()));
                }
                for tree in trees {
                    tree.validate(width)?;
                }
            }
        }
        Ok(())
    }

    /// Probability of the positive class for one (already transformed) row.
    pub fn probability(&self, row: &[f64]) -> Result<f64> {
        match self {
            Classifier::Logistic { coefficients, intercept } => {
                if row.len() != coefficients.len() {
                    return Err(ModelError::WidthMismatch {
                        expected: coefficients.len(),
                        actual: row.len(),
                    });
                }
                let z = intercept
                    + coefficients.iter().zip(row).map(|(w, x)| w * x).sum::<f64>();
                Ok(sigmoid(z))
            }
            Classifier::Forest { trees } => {
                let mut total = 0.0;
                for tree in trees {
                    total += tree.predict(row)?;
                }
                Ok(total / trees.len() as f64)
            }
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// A fitted classifier together with the input columns it was trained on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierPipeline {
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
    pub classifier: Classifier,
}

impl ClassifierPipeline {
    pub fn width(&self) -> usize {
        self.feature_names.len()
    }

    pub fn validate(&self) -> Result<()> {
        if self.feature_names.is_empty() {
            return Err(ModelError::Malformed("pipeline names no features".to_string()));
        }
        if let Some(scaler) = &self.scaler {
            scaler.validate()?;
            if scaler.width() != self.width() {
                return Err(ModelError::Malformed(format!(
                    "pipeline scaler expects {} features, pipeline has {}",
                    scaler.width(),
                    self.width()
                )));
            }
        }
        self.classifier.validate(self.width())
    }

    pub fn predict_proba(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.width() {
            return Err(ModelError::WidthMismatch {
                expected: self.width(),
                actual: row.len(),
            });
        }
        let p = match &self.scaler {
            Some(scaler) => self.classifier.probability(&scaler.transform(row)?)?,
            None => self.classifier.probability(row)?,
        };
        if !p.is_finite() {
            return Err(ModelError::NonFinite(p));
        }
        Ok(p)
    }

    /// Predicted class, `0` or `1`.
    pub fn predict(&self, row: &[f64]) -> Result<u8> {
        Ok(u8::from(self.predict_proba(row)? >= DECISION_THRESHOLD))
    }
}
