//! Application layer errors

use thiserror::Error;

/// Errors a plugin can return from its execution entry point
#[derive(Error, Debug)]
pub enum PluginError {
    /// The plugin looked at the request and it isn't meant for it
    #[error("No match found: {0}")]
    NoMatch(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Timed out: {0}")]
    Timeout(String),
}

impl PluginError {
    pub fn no_match(message: impl Into<String>) -> Self {
        Self::NoMatch(message.into())
    }

    /// Anything but NoMatch means the plugin applied and broke
    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch(_))
    }
}

impl From<reqwest::Error> for PluginError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for PluginError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidData(e.to_string())
    }
}

/// Note storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Lock poisoned")]
    Poisoned,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing configuration section: {0}")]
    MissingSection(String),

    #[error("Invalid configuration for {section}: {reason}")]
    InvalidSection { section: String, reason: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub fn invalid(section: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSection {
            section: section.into(),
            reason: reason.into(),
        }
    }
}

/// Request validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid token")]
    InvalidToken,
}
