//! Request-side feature records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ModelError, Result};

/// Column order the Titanic pipeline was fitted on.
pub const TITANIC_FEATURES: [&str; 7] = ["Pclass", "Sex", "Age", "SibSp", "Parch", "Fare", "Embarked"];

/// One passenger. Only types and presence are checked; values are passed
/// to the model as given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TitanicRecord {
    /// Ticket class (1, 2, 3)
    #[serde(rename = "Pclass")]
    pub pclass: i64,
    /// Encoded sex (0 or 1)
    #[serde(rename = "Sex")]
    pub sex: i64,
    #[serde(rename = "Age")]
    pub age: f64,
    /// Siblings/spouses aboard
    #[serde(rename = "SibSp")]
    pub sibsp: i64,
    /// Parents/children aboard
    #[serde(rename = "Parch")]
    pub parch: i64,
    #[serde(rename = "Fare")]
    pub fare: f64,
    /// Encoded port of embarkation
    #[serde(rename = "Embarked")]
    pub embarked: i64,
}

impl TitanicRecord {
    /// Single input row in [`TITANIC_FEATURES`] order.
    pub fn to_row(&self) -> [f64; 7] {
        [
            self.pclass as f64,
            self.sex as f64,
            self.age,
            self.sibsp as f64,
            self.parch as f64,
            self.fare,
            self.embarked as f64,
        ]
    }
}

/// Named real-valued housing features. The schema is owned by the fitted
/// scaler, see [`HousingRecord::arrange`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HousingRecord(pub BTreeMap<String, f64>);

impl HousingRecord {
    /// Arrange the values in `schema` order. Every schema feature must be
    /// present and no other feature may appear.
    pub fn arrange(&self, schema: &[String]) -> Result<Vec<f64>> {
        let missing: Vec<&str> = schema
            .iter()
            .filter(|name| !self.0.contains_key(name.as_str()))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(ModelError::InvalidInput(format!(
                "missing housing features: {}",
                missing.join(", ")
            )));
        }

        let unknown: Vec<&str> = self
            .0
            .keys()
            .filter(|key| !schema.contains(key))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            return Err(ModelError::InvalidInput(format!(
                "unknown housing features: {}",
                unknown.join(", ")
            )));
        }

        Ok(schema.iter().map(|name| self.0[name]).collect())
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for HousingRecord {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
