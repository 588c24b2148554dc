use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrafficError>;

#[derive(Debug, Error)]
pub enum TrafficError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

impl TrafficError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TrafficError::Http(e) if e.is_timeout())
    }
}
