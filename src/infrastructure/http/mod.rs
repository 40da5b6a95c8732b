//! HTTP fetcher backed by reqwest

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::application::errors::PluginError;
use crate::domain::traits::{Fetched, Fetcher};

/// Fetcher doing real outbound requests
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, PluginError> {
        let client = Client::builder()
            .user_agent(concat!("igor-bot/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<Fetched, PluginError> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(Fetched { status, body })
    }
}
