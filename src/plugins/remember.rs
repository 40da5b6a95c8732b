//! Remember plugin - Named links kept in a note store

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::errors::{ConfigError, PluginError};
use crate::domain::entities::{Catalog, Note, Response};
use crate::domain::traits::{Invocation, Plugin, Store};
use crate::infrastructure::config::{plugin_config, ConfigSource};
use crate::infrastructure::storage::SqliteStore;

pub const NAME: &str = "remember";

/// `remember` configuration section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RememberConfig {
    /// SQLite database file
    pub database: String,
    /// Users allowed to make Igor forget
    #[serde(default)]
    pub admins: Vec<String>,
    /// Users not allowed to make Igor remember
    #[serde(default)]
    pub blacklist: Vec<String>,
}

pub struct RememberPlugin {
    catalog: Catalog,
    config: RememberConfig,
    store: Arc<dyn Store>,
}

impl RememberPlugin {
    pub fn new(catalog: Catalog, config: RememberConfig, store: Arc<dyn Store>) -> Self {
        Self { catalog, config, store }
    }

    pub fn from_config(source: &dyn ConfigSource) -> Result<Self, ConfigError> {
        let config: RememberConfig = plugin_config(source, NAME)?;
        if config.database.trim().is_empty() {
            return Err(ConfigError::invalid(NAME, "no database configured"));
        }
        let store = SqliteStore::open(&config.database)
            .map_err(|e| ConfigError::invalid(NAME, e.to_string()))?;
        Ok(Self::new(source.catalog(NAME), config, Arc::new(store)))
    }

    async fn handle_remember(&self, invocation: &Invocation<'_>) -> Result<Response, PluginError> {
        let request = invocation.request;
        if request.user_in_list(&self.config.blacklist) {
            return Ok(Response::new(invocation.text("forbidden")));
        }
        let mut parts = invocation.argument().split_whitespace();
        let (Some(name), Some(url)) = (parts.next(), parts.next()) else {
            return Ok(Response::new(invocation.text("usage")));
        };
        let name = name.to_lowercase();

        self.store.save(&Note::new(name.as_str(), url, request.user_name.as_str())).await?;
        tracing::info!("{} asked to remember '{}'", request.user_name, name);
        Ok(Response::new(invocation.fill("response_text", &name)))
    }

    async fn handle_show(&self, invocation: &Invocation<'_>) -> Result<Response, PluginError> {
        let name = invocation.argument().to_lowercase();
        if name.is_empty() {
            return Ok(Response::new(invocation.text("no_result")));
        }
        match self.store.get(&name).await? {
            Some(note) => {
                let mut response = Response::new(note.url);
                response.set_public();
                response.unfurl_links = true;
                response.unfurl_media = true;
                Ok(response)
            }
            None => Ok(Response::new(invocation.text("no_result"))),
        }
    }

    async fn handle_forget(&self, invocation: &Invocation<'_>) -> Result<Response, PluginError> {
        if !invocation.request.user_in_list(&self.config.admins) {
            return Ok(Response::new(invocation.text("forbidden")));
        }
        let name = invocation.argument().to_lowercase();
        if !name.is_empty() && self.store.delete(&name).await? {
            Ok(Response::new(invocation.fill("response_text", &name)))
        } else {
            Ok(Response::new(invocation.text("no_result")))
        }
    }

    async fn handle_show_all(&self, invocation: &Invocation<'_>) -> Result<Response, PluginError> {
        let notes = self.store.all().await?;
        if notes.is_empty() {
            return Ok(Response::new(invocation.text("no_result")));
        }
        let mut text = invocation.text("response_text").to_string();
        for note in notes {
            text.push_str(&format!("\n * {} ({})", note.name, note.user));
        }
        Ok(Response::new(text))
    }
}

#[async_trait]
impl Plugin for RememberPlugin {
    fn name(&self) -> &str {
        NAME
    }

    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    async fn execute(&self, invocation: &Invocation<'_>) -> Result<Response, PluginError> {
        match invocation.command() {
            "remember" => self.handle_remember(invocation).await,
            "show" => self.handle_show(invocation).await,
            "forget" => self.handle_forget(invocation).await,
            "showall" => self.handle_show_all(invocation).await,
            other => Err(PluginError::no_match(other)),
        }
    }
}
