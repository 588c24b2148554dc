//! straitwatch-models: fitted statistical artifacts and the feature records they consume.
//!
//! Artifacts are JSON documents produced offline. They are loaded once at
//! startup into a [`ModelRegistry`] and used read-only afterwards.

pub mod classifier;
pub mod error;
pub mod records;
pub mod registry;
pub mod regressor;
pub mod scaler;
pub mod tree;

pub use classifier::{Classifier, ClassifierPipeline};
pub use error::{ModelError, Result};
pub use records::{HousingRecord, TitanicRecord, TITANIC_FEATURES};
pub use registry::{ModelPaths, ModelRegistry, ModelSummary};
pub use regressor::Regressor;
pub use scaler::StandardScaler;
pub use tree::{DecisionTree, SplitCondition, TreeNode};
