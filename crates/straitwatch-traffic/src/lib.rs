//! straitwatch-traffic: passthrough clients for the upstream maritime and air traffic providers.

pub mod error;
pub mod http;
pub mod provider;

pub use error::{Result, TrafficError};
pub use http::HttpTrafficProvider;
pub use provider::{MockTrafficProvider, TrafficFeed, TrafficProvider, TrafficSnapshot};
