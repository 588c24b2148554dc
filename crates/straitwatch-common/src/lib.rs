//! straitwatch-common: configuration and error types shared by the Straitwatch crates.

pub mod config;
pub mod error;

pub use config::Config;
pub use error::{ConfigError, Result};
