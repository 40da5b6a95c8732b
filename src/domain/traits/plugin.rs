use std::sync::Arc;

use async_trait::async_trait;

use crate::application::errors::PluginError;
use crate::application::messaging::resolver::{argument_of, Resolution};
use crate::domain::entities::{catalog, Catalog, Request, Response};

/// Plugin trait - a capability provider offering one or more chat commands
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Unique name, used for allow/deny lists
    fn name(&self) -> &str;

    /// The commands this plugin understands, per language
    fn catalog(&self) -> &Catalog;

    /// Handle a request whose command was resolved against [`Plugin::catalog`].
    ///
    /// Return [`PluginError::NoMatch`] when the request turns out not to apply.
    async fn execute(&self, invocation: &Invocation<'_>) -> Result<Response, PluginError>;

    /// Global description of the plugin
    fn description(&self, language: &str) -> String {
        self.catalog().description(language).to_string()
    }

    /// Usage pattern and description of every command in a language
    fn describe(&self, language: &str) -> Vec<(String, String)> {
        self.catalog()
            .language(language)
            .map(|entry| {
                entry
                    .commands
                    .values()
                    .map(|c| (c.usage(), c.description.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Everything a plugin gets to see while handling one request
pub struct Invocation<'a> {
    pub request: &'a Request,
    /// The request text as seen by the plugin (force-public marker removed)
    pub message: &'a str,
    pub resolution: Resolution,
    pub catalog: &'a Catalog,
    /// All active plugins, including the one being invoked
    pub peers: &'a [Arc<dyn Plugin>],
}

impl<'a> Invocation<'a> {
    pub fn command(&self) -> &str {
        &self.resolution.command
    }

    pub fn language(&self) -> &str {
        &self.resolution.language
    }

    /// Positional argument with original casing; empty when none was given
    pub fn argument(&self) -> &'a str {
        argument_of(self.message)
    }

    /// Localized text fragment of the resolved command
    pub fn text(&self, key: &str) -> &'a str {
        self.catalog.text(self.language(), self.command(), key)
    }

    /// Localized text fragment of another command of the same plugin
    pub fn text_of(&self, command: &str, key: &str) -> &'a str {
        self.catalog.text(self.language(), command, key)
    }

    /// Localized text fragment with the argument marker substituted
    pub fn fill(&self, key: &str, value: &str) -> String {
        catalog::fill(self.text(key), value)
    }
}
