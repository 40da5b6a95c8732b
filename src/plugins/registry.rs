//! Plugin registry - The set of plugins active for dispatching

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::errors::ConfigError;
use crate::domain::traits::Plugin;

/// Name of the plugin that can never be disabled
pub const HELP: &str = "help";

/// A plugin constructor's outcome, tagged with the plugin's name
pub type Candidate = (String, Result<Arc<dyn Plugin>, ConfigError>);

/// Registry of active plugins
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginRegistry {
    /// Build the active set from every constructed plugin.
    ///
    /// Plugins that failed construction are left out. A non-empty allow-list
    /// narrows the set to the named plugins, a non-empty deny-list then removes
    /// plugins by name. Help survives both.
    pub fn build<I>(candidates: I, allow: &[String], deny: &[String]) -> Self
    where
        I: IntoIterator<Item = Candidate>,
    {
        let allow: HashSet<&str> = allow.iter().map(String::as_str).collect();
        let deny: HashSet<&str> = deny.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();
        let mut plugins = Vec::new();

        for (name, candidate) in candidates {
            let plugin = match candidate {
                Ok(plugin) => plugin,
                Err(e) => {
                    warn!("Plugin '{}' not available: {}", name, e);
                    continue;
                }
            };
            let name = plugin.name().to_string();
            let is_help = name == HELP;

            if !allow.is_empty() && !allow.contains(name.as_str()) && !is_help {
                debug!("Plugin '{}' not in whitelist", name);
                continue;
            }
            if deny.contains(name.as_str()) && !is_help {
                debug!("Plugin '{}' blacklisted", name);
                continue;
            }
            if !seen.insert(name.clone()) {
                warn!("Plugin '{}' already registered", name);
                continue;
            }

            info!("Registering plugin: {}", name);
            plugins.push(plugin);
        }

        Self { plugins }
    }

    /// All active plugins, in no particular order
    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.plugins.iter().find(|p| p.name() == name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.name() == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.plugins.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
