//! Bearer-token REST client for a traffic provider.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use straitwatch_common::config::ProviderConfig;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::provider::{TrafficFeed, TrafficProvider, TrafficSnapshot};

pub struct HttpTrafficProvider {
    feed: TrafficFeed,
    client: Client,
    url: String,
    api_key: Option<SecretString>,
}

impl HttpTrafficProvider {
    /// Build a client whose every request is bounded by `timeout`.
    pub fn new(
        feed: TrafficFeed,
        url: impl Into<String>,
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { feed, client, url: url.into(), api_key })
    }

    pub fn from_config(feed: TrafficFeed, config: &ProviderConfig, timeout: Duration) -> Result<Self> {
        let api_key = config
            .api_key
            .as_ref()
            .map(|k| SecretString::from(k.expose_secret().to_string()));
        Self::new(feed, config.url.clone(), api_key, timeout)
    }
}

#[async_trait]
impl TrafficProvider for HttpTrafficProvider {
    fn feed(&self) -> TrafficFeed {
        self.feed
    }

    #[instrument(skip(self), fields(feed = self.feed.name()))]
    async fn fetch(&self) -> Result<TrafficSnapshot> {
        let mut request = self.client.get(&self.url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request.send().await?.error_for_status()?;
        let body = response.bytes().await?;
        debug!(bytes = body.len(), "Provider responded");

        TrafficSnapshot::from_slice(&body)
    }
}
