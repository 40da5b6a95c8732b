use std::sync::Arc;

use crate::application::messaging::Dispatcher;
use crate::domain::entities::{Request, Response};
use crate::plugins::PluginRegistry;

/// Service handling one slash command call from validation to escaped response
pub struct CommandService {
    token: String,
    dispatcher: Dispatcher,
}

impl CommandService {
    pub fn new(token: impl Into<String>, registry: Arc<PluginRegistry>) -> Self {
        Self {
            token: token.into(),
            dispatcher: Dispatcher::new(registry),
        }
    }

    /// Validate, dispatch and escape. Always yields a well-formed response.
    pub async fn handle(&self, request: &Request) -> Response {
        let mut response = match request.validate(&self.token) {
            Ok(()) => self.dispatcher.dispatch(request).await,
            Err(e) => {
                tracing::warn!("Rejected request from team '{}': {}", request.team_domain, e);
                Response::invalid_token()
            }
        };
        response.escape();
        response
    }

    pub fn registry(&self) -> &PluginRegistry {
        self.dispatcher.registry()
    }
}
