//! Command resolver - Matches free text against a plugin's localized catalog

use crate::domain::entities::Catalog;

/// The canonical command a message resolved to, and the language it was written in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub command: String,
    pub language: String,
}

impl Resolution {
    pub fn new(command: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: language.into(),
        }
    }
}

/// Resolve a raw message against a catalog.
///
/// Argument-bearing patterns are tried first, by comparing their fixed prefix
/// with the first word of the message. Patterns without an argument must match
/// the whole message. Comparison is case-insensitive; `None` means no match.
pub fn resolve(message: &str, catalog: &Catalog) -> Option<Resolution> {
    let normalized = message.trim().to_lowercase();
    let key = sub_command(&normalized)?;

    for (language, entry) in catalog.languages() {
        for (id, command) in &entry.commands {
            if let Some(prefix) = command.argument_prefix() {
                if !prefix.is_empty() && prefix.to_lowercase() == key {
                    return Some(Resolution::new(id, language));
                }
            }
        }
    }

    for (language, entry) in catalog.languages() {
        for (id, command) in &entry.commands {
            if command.argument_prefix().is_none()
                && command.command.trim().to_lowercase() == normalized
            {
                return Some(Resolution::new(id, language));
            }
        }
    }

    None
}

/// First whitespace-delimited token of a message
pub fn sub_command(message: &str) -> Option<&str> {
    message.split_whitespace().next()
}

/// Everything after the first token, trimmed, with the original casing
pub fn argument_of(message: &str) -> &str {
    let trimmed = message.trim_start();
    match trimmed.find(char::is_whitespace) {
        Some(idx) => trimmed[idx..].trim(),
        None => "",
    }
}
