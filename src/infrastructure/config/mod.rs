//! Configuration management

pub mod language;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::errors::ConfigError;
use crate::domain::entities::Catalog;
pub use language::LanguagePack;

/// Environment variable that may hold the whole configuration document
pub const CONFIG_ENV: &str = "IGOR_CONFIG";

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Verification token Slack sends along with every request
    pub token: String,
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Directory with `<language>.yaml` files; the bundled packs are used when unset
    #[serde(default)]
    pub language_dir: Option<PathBuf>,
    /// When set, only these plugins (and help) are active
    #[serde(default, alias = "allow-list")]
    pub whitelist: Option<Vec<String>>,
    /// Plugins that are never active (help can't be disabled)
    #[serde(default, alias = "deny-list")]
    pub blacklist: Option<Vec<String>>,
    #[serde(default = "default_worker_timeout")]
    pub worker_timeout_secs: u64,
    /// Plugin specific sections, keyed by plugin
    #[serde(flatten)]
    pub plugins: BTreeMap<String, serde_yaml::Value>,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_worker_timeout() -> u64 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: String::new(),
            default_language: default_language(),
            language_dir: None,
            whitelist: None,
            blacklist: None,
            worker_timeout_secs: default_worker_timeout(),
            plugins: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config {}: {}", path.display(), e)))?;
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            return serde_json::from_str(&content)
                .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)));
        }
        Self::parse(&content)
    }

    /// Parse a YAML or JSON document (JSON being valid YAML)
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Load from `IGOR_CONFIG` when set, otherwise from the file
    pub fn load_env_or(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV) {
            Ok(inline) if !inline.trim().is_empty() => Self::parse(&inline),
            _ => Self::load(path),
        }
    }

    pub fn worker_timeout(&self) -> Duration {
        Duration::from_secs(self.worker_timeout_secs.max(1))
    }

    pub fn allow_list(&self) -> &[String] {
        self.whitelist.as_deref().unwrap_or_default()
    }

    pub fn deny_list(&self) -> &[String] {
        self.blacklist.as_deref().unwrap_or_default()
    }

    pub fn with_section(mut self, name: impl Into<String>, value: serde_yaml::Value) -> Self {
        self.plugins.insert(name.into(), value);
        self
    }
}

/// Where plugins get their configuration and catalogs from
pub trait ConfigSource: Send + Sync {
    /// Raw configuration section of a plugin, if there is one
    fn plugin_section(&self, plugin: &str) -> Option<&serde_yaml::Value>;

    /// Localized catalog of a plugin, across every known language, falling
    /// back to the default language for lookups in languages it lacks
    fn catalog(&self, plugin: &str) -> Catalog;

    fn default_language(&self) -> &str;

    fn worker_timeout(&self) -> Duration;
}

/// Deserialize a plugin's section; a missing section is a configuration fault
pub fn plugin_config<T: DeserializeOwned>(
    source: &dyn ConfigSource,
    plugin: &str,
) -> Result<T, ConfigError> {
    let section = source
        .plugin_section(plugin)
        .ok_or_else(|| ConfigError::MissingSection(plugin.to_string()))?;
    serde_yaml::from_value(section.clone()).map_err(|e| ConfigError::invalid(plugin, e.to_string()))
}

/// Configuration file plus the language pack it points to
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: Config,
    pub languages: LanguagePack,
}

impl Settings {
    pub fn new(config: Config, languages: LanguagePack) -> Self {
        Self { config, languages }
    }

    /// Resolve the language pack the config points to
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let languages = match &config.language_dir {
            Some(dir) => LanguagePack::from_dir(dir)?,
            None => LanguagePack::bundled()?,
        };
        Ok(Self::new(config, languages))
    }
}

impl ConfigSource for Settings {
    fn plugin_section(&self, plugin: &str) -> Option<&serde_yaml::Value> {
        self.config.plugins.get(plugin)
    }

    fn catalog(&self, plugin: &str) -> Catalog {
        self.languages
            .catalog(plugin)
            .with_fallback(self.default_language())
    }

    fn default_language(&self) -> &str {
        &self.config.default_language
    }

    fn worker_timeout(&self) -> Duration {
        self.config.worker_timeout()
    }
}

/// Default configuration written by `init-config`
pub const DEFAULT_CONFIG: &str = r#"# Verification token of the Slack slash command
token: change-me
default-language: en
# language-dir: ./language
# whitelist: [help, weather]
# blacklist: [tumblr]
worker-timeout-secs: 5

weather:
  api-token: your-openweathermap-token
  default-city: Amsterdam
  units: metric

status:
  main: [github, cloudflare, npmjs]

# randomtumblr:
#   staff:
#     name: Tumblr Staff
#     url: https://staff.tumblr.com

# remember:
#   database: igor.db
#   admins: [your-user-name]
#   blacklist: []
"#;
