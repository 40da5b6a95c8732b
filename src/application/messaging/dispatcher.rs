//! Message dispatcher - Routes a request to the first plugin that handles it

use std::sync::Arc;

use crate::domain::entities::{Request, Response};
use crate::domain::traits::Invocation;
use crate::plugins::PluginRegistry;
use super::resolver::resolve;

/// Leading character that makes any response public
pub const FORCE_PUBLIC_MARKER: char = '!';

/// Dispatcher - asks every active plugin in turn, first success wins
pub struct Dispatcher {
    registry: Arc<PluginRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Find a response for the request. Never fails: when no plugin delivers,
    /// one of the generic fallback responses is returned.
    pub async fn dispatch(&self, request: &Request) -> Response {
        let (message, force_public) = strip_force_public(&request.text);
        let peers = self.registry.plugins();
        let mut faulted = false;

        for plugin in peers {
            let catalog = plugin.catalog();
            let Some(resolution) = resolve(message, catalog) else {
                continue;
            };
            tracing::debug!(
                "[{}] resolved '{}' ({})",
                plugin.name(),
                resolution.command,
                resolution.language
            );

            let invocation = Invocation {
                request,
                message,
                resolution,
                catalog,
                peers,
            };
            match plugin.execute(&invocation).await {
                Ok(mut response) => {
                    if force_public {
                        response.set_public();
                    }
                    tracing::info!("[{}] handled '{}'", plugin.name(), invocation.command());
                    return response;
                }
                Err(e) if e.is_no_match() => {
                    tracing::debug!("[{}] {}", plugin.name(), e);
                }
                Err(e) => {
                    tracing::warn!("[{}] Error: {}", plugin.name(), e);
                    faulted = true;
                }
            }
        }

        if faulted {
            Response::something_went_wrong()
        } else {
            Response::nothing_found(request)
        }
    }
}

/// Remove the force-public marker, reporting whether it was present
pub fn strip_force_public(text: &str) -> (&str, bool) {
    let trimmed = text.trim_start();
    match trimmed.strip_prefix(FORCE_PUBLIC_MARKER) {
        Some(rest) => (rest, true),
        None => (text, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_force_public() {
        assert_eq!(strip_force_public("!help"), ("help", true));
        assert_eq!(strip_force_public("  !weather x"), ("weather x", true));
        assert_eq!(strip_force_public("help!"), ("help!", false));
        assert_eq!(strip_force_public(""), ("", false));
        assert_eq!(strip_force_public("!"), ("", true));
    }
}
