use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::application::errors::PluginError;

/// Raw result of an outbound GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub status: u16,
    pub body: String,
}

impl Fetched {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, PluginError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Fetcher trait - abstraction for the external services plugins consult
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<Fetched, PluginError>;
}
