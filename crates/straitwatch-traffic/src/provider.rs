//! Trait for real-time traffic data access.
//!
//! The gateway relays whatever the provider returns; the only requirement
//! on the payload is that it is valid JSON.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::value::RawValue;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Result, TrafficError};

/// The two upstream feeds the gateway relays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficFeed {
    /// Vessel positions (Kpler)
    Maritime,
    /// Aircraft positions (ADS-B Exchange)
    Air,
}

impl TrafficFeed {
    pub fn name(self) -> &'static str {
        match self {
            TrafficFeed::Maritime => "maritime",
            TrafficFeed::Air => "air",
        }
    }

    /// Fixed message returned to callers when the feed fails.
    pub fn failure_detail(self) -> &'static str {
        match self {
            TrafficFeed::Maritime => "Error fetching maritime traffic data",
            TrafficFeed::Air => "Error fetching air traffic data",
        }
    }
}

/// Provider payload, kept as the exact JSON text received.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct TrafficSnapshot(Box<RawValue>);

impl TrafficSnapshot {
    /// Validate `body` as JSON without re-encoding it.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let raw: &RawValue = serde_json::from_slice(body)?;
        Ok(Self(raw.to_owned()))
    }

    pub fn from_json_str(body: &str) -> Result<Self> {
        Ok(Self(RawValue::from_string(body.to_string())?))
    }

    pub fn as_str(&self) -> &str {
        self.0.get()
    }
}

/// A source of real-time traffic data.
///
/// Implementations can use:
/// - the provider's REST API ([`crate::HttpTrafficProvider`])
/// - canned responses (testing)
#[async_trait]
pub trait TrafficProvider: Send + Sync {
    fn feed(&self) -> TrafficFeed;

    /// Fetch the current snapshot. Any transport, status, or decoding
    /// failure is an error; there is no retry.
    async fn fetch(&self) -> Result<TrafficSnapshot>;
}

// ── Mock Implementation for Testing ────────────────────────────────────────

/// Provider with a canned response.
pub struct MockTrafficProvider {
    feed: TrafficFeed,
    response: std::result::Result<String, String>,
    calls: AtomicUsize,
}

impl MockTrafficProvider {
    pub fn returning(feed: TrafficFeed, body: &str) -> Self {
        Self { feed, response: Ok(body.to_string()), calls: AtomicUsize::new(0) }
    }

    pub fn failing(feed: TrafficFeed, reason: &str) -> Self {
        Self { feed, response: Err(reason.to_string()), calls: AtomicUsize::new(0) }
    }

    /// How many times `fetch` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl TrafficProvider for MockTrafficProvider {
    fn feed(&self) -> TrafficFeed {
        self.feed
    }

    async fn fetch(&self) -> Result<TrafficSnapshot> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match &self.response {
            Ok(body) => TrafficSnapshot::from_json_str(body),
            Err(reason) => Err(TrafficError::Unavailable(reason.clone())),
        }
    }
}
