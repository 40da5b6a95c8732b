use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Placeholder marking the positional argument in an invocation pattern
/// and the substitution point in text fragments
pub const ARGUMENT_MARKER: &str = "[replace]";

/// One localized command
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommandEntry {
    /// What the user types, optionally containing [`ARGUMENT_MARKER`]
    pub command: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub texts: BTreeMap<String, String>,
    /// Shown in place of the argument marker in listings, e.g. `city`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl CommandEntry {
    pub fn new(command: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            description: description.into(),
            texts: BTreeMap::new(),
            placeholder: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.texts.insert(key.into(), value.into());
        self
    }

    /// The fixed part before the argument marker, if the pattern has one
    pub fn argument_prefix(&self) -> Option<&str> {
        self.command
            .find(ARGUMENT_MARKER)
            .map(|idx| self.command[..idx].trim())
    }

    /// The pattern as listed to users, with the marker shown as `[placeholder]`
    /// or dropped when there is no placeholder
    pub fn usage(&self) -> String {
        let shown = match &self.placeholder {
            Some(placeholder) => format!("[{}]", placeholder),
            None => String::new(),
        };
        fill(&self.command, &shown).trim().to_string()
    }
}

/// All commands of one plugin in one language
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LanguageEntry {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub commands: BTreeMap<String, CommandEntry>,
}

/// Localized command table of a single plugin, keyed by language
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    languages: BTreeMap<String, LanguageEntry>,
    /// Consulted by lookups when the requested language has no entry
    fallback: Option<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(mut self, language: impl Into<String>, entry: LanguageEntry) -> Self {
        self.languages.insert(language.into(), entry);
        self
    }

    pub fn with_fallback(mut self, language: impl Into<String>) -> Self {
        self.fallback = Some(language.into());
        self
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    pub fn languages(&self) -> impl Iterator<Item = (&str, &LanguageEntry)> {
        self.languages.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn language(&self, language: &str) -> Option<&LanguageEntry> {
        self.languages.get(language).or_else(|| {
            self.fallback
                .as_deref()
                .and_then(|fallback| self.languages.get(fallback))
        })
    }

    pub fn command(&self, language: &str, command: &str) -> Option<&CommandEntry> {
        self.language(language)?.commands.get(command)
    }

    /// A named text fragment; empty when the catalog doesn't define it
    pub fn text(&self, language: &str, command: &str, key: &str) -> &str {
        self.command(language, command)
            .and_then(|c| c.texts.get(key))
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn description(&self, language: &str) -> &str {
        self.language(language)
            .map(|l| l.description.as_str())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

impl FromIterator<(String, LanguageEntry)> for Catalog {
    fn from_iter<T: IntoIterator<Item = (String, LanguageEntry)>>(iter: T) -> Self {
        Self {
            languages: iter.into_iter().collect(),
            fallback: None,
        }
    }
}

/// Substitute the argument marker in a text fragment
pub fn fill(template: &str, value: &str) -> String {
    template.replacen(ARGUMENT_MARKER, value, 1)
}
