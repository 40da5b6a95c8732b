//! Language packs - localized command catalogs for every plugin

use std::collections::BTreeMap;
use std::path::Path;

use crate::application::errors::ConfigError;
use crate::domain::entities::{Catalog, LanguageEntry};

const BUNDLED: [(&str, &str); 2] = [
    ("en", include_str!("languages/en.yaml")),
    ("nl", include_str!("languages/nl.yaml")),
];

/// Plugin catalogs of a single language, keyed by plugin name
pub type LanguageFile = BTreeMap<String, LanguageEntry>;

/// All languages and their plugin catalogs
#[derive(Debug, Clone, Default)]
pub struct LanguagePack {
    languages: BTreeMap<String, LanguageFile>,
}

impl LanguagePack {
    /// The packs compiled into the binary
    pub fn bundled() -> Result<Self, ConfigError> {
        let mut pack = Self::default();
        for (language, content) in BUNDLED {
            pack.add_yaml(language, content)?;
        }
        Ok(pack)
    }

    /// Load every `*.yaml`/`*.yml` file in a directory, named after its language
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let mut pack = Self::default();

        for entry in std::fs::read_dir(dir)? {
            let path = match entry {
                Ok(e) => e.path(),
                Err(e) => {
                    tracing::warn!("Failed to read directory entry: {}", e);
                    continue;
                }
            };
            let is_yaml = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            );
            let Some(language) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if !is_yaml || language.starts_with('.') {
                continue;
            }

            let content = std::fs::read_to_string(&path)?;
            pack.add_yaml(language, &content)?;
            tracing::debug!("Loaded language '{}' from {}", language, path.display());
        }

        if pack.languages.is_empty() {
            return Err(ConfigError::Parse(format!("No language files in {}", dir.display())));
        }
        Ok(pack)
    }

    pub fn add_yaml(&mut self, language: &str, content: &str) -> Result<(), ConfigError> {
        let file: LanguageFile = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Language '{}': {}", language, e)))?;
        self.languages.insert(language.to_string(), file);
        Ok(())
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// Catalog of one plugin; languages without an entry for it are left out
    pub fn catalog(&self, plugin: &str) -> Catalog {
        self.languages
            .iter()
            .filter_map(|(language, file)| {
                file.get(plugin).map(|entry| (language.clone(), entry.clone()))
            })
            .collect()
    }
}
