//! Error types for artifact loading and inference.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to read artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse artifact {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed artifact: {0}")]
    Malformed(String),

    #[error("Input width mismatch: expected {expected} features, got {actual}")]
    WidthMismatch { expected: usize, actual: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Model produced a non-finite value: {0}")]
    NonFinite(f64),
}

impl ModelError {
    /// True for errors caused by the caller's payload rather than the artifact.
    pub fn is_input_error(&self) -> bool {
        matches!(self, ModelError::InvalidInput(_))
    }
}
