//! Plugins for igor-bot
//!
//! Every plugin is built once from the configuration; the registry decides
//! which of them end up active.

pub mod help;
pub mod registry;
pub mod remember;
pub mod status;
pub mod tumblr;
pub mod weather;
pub mod xkcd;

use std::sync::Arc;

pub use registry::{Candidate, PluginRegistry, HELP};

use crate::domain::traits::{Fetcher, Plugin};
use crate::infrastructure::config::ConfigSource;

fn candidate<P: Plugin + 'static>(name: &str, built: Result<P, crate::application::errors::ConfigError>) -> Candidate {
    (name.to_string(), built.map(|p| Arc::new(p) as Arc<dyn Plugin>))
}

/// Construct every known plugin. Help comes first so it is asked first.
pub fn available(source: &dyn ConfigSource, fetcher: Arc<dyn Fetcher>) -> Vec<Candidate> {
    vec![
        candidate(HELP, Ok(help::HelpPlugin::from_config(source))),
        candidate(weather::NAME, weather::WeatherPlugin::from_config(source, fetcher.clone())),
        candidate(xkcd::NAME, Ok(xkcd::XkcdPlugin::from_config(source, fetcher.clone()))),
        candidate(tumblr::NAME, tumblr::TumblrPlugin::from_config(source, fetcher.clone())),
        candidate(status::NAME, status::StatusPlugin::from_config(source, fetcher)),
        candidate(remember::NAME, remember::RememberPlugin::from_config(source)),
    ]
}
