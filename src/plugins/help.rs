//! Help plugin - Lists what every active Igor can do and tells about itself

use async_trait::async_trait;

use crate::application::errors::PluginError;
use crate::application::messaging::Aggregator;
use crate::domain::entities::{Attachment, Catalog, Field, Response};
use crate::domain::traits::{Invocation, Plugin};
use crate::infrastructure::config::ConfigSource;
use super::registry::HELP;

pub struct HelpPlugin {
    catalog: Catalog,
    aggregator: Aggregator,
}

impl HelpPlugin {
    pub fn new(catalog: Catalog, aggregator: Aggregator) -> Self {
        Self { catalog, aggregator }
    }

    /// Help has no configuration section, so it can't fail to build
    pub fn from_config(source: &dyn ConfigSource) -> Self {
        Self::new(source.catalog(HELP), Aggregator::new(source.worker_timeout()))
    }

    /// One attachment per active plugin, built concurrently
    async fn handle_help(&self, invocation: &Invocation<'_>) -> Response {
        let mut response = Response::new(invocation.text("response_text"));
        let language = invocation.language().to_string();

        let jobs = invocation.peers.iter().cloned().map(|plugin| {
            let language = language.clone();
            async move {
                let mut commands = plugin.describe(&language);
                commands.sort();
                let text: String = commands
                    .iter()
                    .map(|(command, description)| format!("- *{}*: {}\n", command, description))
                    .collect();
                let mut attach = Attachment::new(plugin.description(&language)).with_text(text);
                attach.enable_markdown_for("text");
                attach
            }
        });
        self.aggregator.gather(&mut response, jobs).await;
        response
    }

    fn handle_intro(&self, invocation: &Invocation<'_>) -> Response {
        let mut response = Response::new(invocation.text("response_text"));
        response.set_public();
        let mut attach = Attachment::new(invocation.text("attach_title"))
            .with_text(invocation.text("attach_text"));
        attach.enable_markdown_for("text");
        response.add_attachment(attach);
        response
    }

    fn handle_tell_me(&self, invocation: &Invocation<'_>) -> Response {
        let mut response = Response::new(invocation.text("response_text"));
        response.add_attachment(
            Attachment::new(invocation.text("github_title")).with_text(invocation.text("github_text")),
        );
        response.add_attachment(
            Attachment::new(invocation.text("articles_title")).with_text(invocation.text("articles_text")),
        );
        response
    }

    fn handle_who_am_i(&self, invocation: &Invocation<'_>) -> Response {
        let request = invocation.request;
        let mut response = Response::new(invocation.text("response_text"));
        let mut attach = Attachment::new(invocation.text("attach_title"));
        for (key, value) in [
            ("name", &request.user_name),
            ("user_id", &request.user_id),
            ("channel", &request.channel_name),
            ("channel_id", &request.channel_id),
            ("team", &request.team_domain),
            ("team_id", &request.team_id),
        ] {
            attach.add_field(Field::short(invocation.text(key), value.as_str()));
        }
        response.add_attachment(attach);
        response
    }
}

#[async_trait]
impl Plugin for HelpPlugin {
    fn name(&self) -> &str {
        HELP
    }

    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    async fn execute(&self, invocation: &Invocation<'_>) -> Result<Response, PluginError> {
        match invocation.command() {
            "help" => Ok(self.handle_help(invocation).await),
            "intro" => Ok(self.handle_intro(invocation)),
            "tellme" => Ok(self.handle_tell_me(invocation)),
            "whoami" => Ok(self.handle_who_am_i(invocation)),
            other => Err(PluginError::no_match(other)),
        }
    }
}
