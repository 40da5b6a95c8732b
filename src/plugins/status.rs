//! Status plugin - Service health reports and website up checks

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::errors::{ConfigError, PluginError};
use crate::application::messaging::Aggregator;
use crate::domain::entities::{catalog, Attachment, Catalog, Response};
use crate::domain::traits::{Fetcher, Invocation, Plugin};
use crate::infrastructure::config::{plugin_config, ConfigSource};

pub const NAME: &str = "status";
const WEBSITE_CHECK: &str = "https://isitup.org/";

/// A service publishing its health through a statuspage.io page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Service {
    pub key: &'static str,
    pub title: &'static str,
    pub page: &'static str,
}

impl Service {
    const fn new(key: &'static str, title: &'static str, page: &'static str) -> Self {
        Self { key, title, page }
    }

    fn api_url(&self) -> String {
        format!("{}/api/v2/status.json", self.page)
    }
}

pub static SERVICES: [Service; 7] = [
    Service::new("bitbucket", "Bitbucket", "https://bitbucket.status.atlassian.com"),
    Service::new("cloudflare", "Cloudflare", "https://www.cloudflarestatus.com"),
    Service::new("disqus", "Disqus", "https://status.disqus.com"),
    Service::new("docker", "Docker", "https://www.dockerstatus.com"),
    Service::new("github", "GitHub", "https://www.githubstatus.com"),
    Service::new("npmjs", "NPM", "https://status.npmjs.org"),
    Service::new("travis", "Travis CI", "https://www.traviscistatus.com"),
];

pub fn service(key: &str) -> Option<&'static Service> {
    SERVICES.iter().find(|s| s.key.eq_ignore_ascii_case(key))
}

/// `status` configuration section, optional as a whole
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusConfig {
    /// Services checked by plain `status`; every known service when empty
    #[serde(default)]
    pub main: Vec<String>,
}

pub struct StatusPlugin {
    catalog: Catalog,
    fetcher: Arc<dyn Fetcher>,
    aggregator: Aggregator,
    main: Vec<&'static Service>,
}

impl StatusPlugin {
    pub fn new(catalog: Catalog, config: StatusConfig, fetcher: Arc<dyn Fetcher>, aggregator: Aggregator) -> Self {
        let main: Vec<&'static Service> = if config.main.is_empty() {
            SERVICES.iter().collect()
        } else {
            config
                .main
                .iter()
                .filter_map(|key| {
                    let found = service(key);
                    if found.is_none() {
                        tracing::warn!("Unknown status service '{}' ignored", key);
                    }
                    found
                })
                .collect()
        };
        Self {
            catalog,
            fetcher,
            aggregator,
            main,
        }
    }

    pub fn from_config(source: &dyn ConfigSource, fetcher: Arc<dyn Fetcher>) -> Result<Self, ConfigError> {
        let config = match source.plugin_section(NAME) {
            Some(_) => plugin_config(source, NAME)?,
            None => StatusConfig::default(),
        };
        Ok(Self::new(
            source.catalog(NAME),
            config,
            fetcher,
            Aggregator::new(source.worker_timeout()),
        ))
    }

    pub fn main_services(&self) -> impl Iterator<Item = &str> {
        self.main.iter().map(|s| s.key)
    }

    async fn handle_main(&self, invocation: &Invocation<'_>) -> Response {
        let mut response = Response::new(invocation.text_of("status", "response_text"));
        response.set_public();

        let jobs = self.main.iter().map(|service| {
            let fetcher = self.fetcher.clone();
            let service: &'static Service = *service;
            async move {
                match check_service(fetcher.as_ref(), service).await {
                    Ok(attach) => attach,
                    Err(e) => {
                        tracing::warn!("Status check for {} failed: {}", service.key, e);
                        Attachment::new(service.title)
                            .with_pre_text(service.page)
                            .with_color("danger")
                            .with_text(e.to_string())
                    }
                }
            }
        });
        self.aggregator.gather(&mut response, jobs).await;
        response
    }

    async fn handle_specific(&self, invocation: &Invocation<'_>) -> Result<Response, PluginError> {
        let target = invocation.argument();
        let (text, attach) = match service(target) {
            Some(service) => (
                invocation.text("response_text"),
                check_service(self.fetcher.as_ref(), service).await?,
            ),
            None => (
                invocation.text("website_text"),
                check_website(self.fetcher.as_ref(), target).await?,
            ),
        };
        let mut response = Response::new(text);
        response.set_public();
        response.add_attachment(attach);
        Ok(response)
    }
}

#[async_trait]
impl Plugin for StatusPlugin {
    fn name(&self) -> &str {
        NAME
    }

    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    async fn execute(&self, invocation: &Invocation<'_>) -> Result<Response, PluginError> {
        match (invocation.command(), invocation.argument()) {
            ("status", _) | ("status_specific", "") => Ok(self.handle_main(invocation).await),
            ("status_specific", _) => self.handle_specific(invocation).await,
            (other, _) => Err(PluginError::no_match(other)),
        }
    }

    fn describe(&self, language: &str) -> Vec<(String, String)> {
        let services = SERVICES.iter().map(|s| s.key).collect::<Vec<_>>().join(", ");
        self.catalog
            .language(language)
            .map(|entry| {
                entry
                    .commands
                    .values()
                    .map(|c| (c.usage(), catalog::fill(&c.description, &services)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct StatusPage {
    status: PageStatus,
}

#[derive(Debug, Deserialize)]
struct PageStatus {
    indicator: String,
    #[serde(default)]
    description: String,
}

/// Slack attachment color of a statuspage.io indicator
pub fn indicator_color(indicator: &str) -> &'static str {
    match indicator {
        "none" => "good",
        "minor" | "maintenance" => "warning",
        _ => "danger",
    }
}

async fn check_service(fetcher: &dyn Fetcher, service: &Service) -> Result<Attachment, PluginError> {
    let fetched = fetcher.get(&service.api_url()).await?;
    if !fetched.is_success() {
        return Err(PluginError::Network(format!("{} returned {}", service.page, fetched.status)));
    }
    let page: StatusPage = fetched.json()?;
    Ok(Attachment::new(service.title)
        .with_pre_text(service.page)
        .with_text(page.status.description)
        .with_color(indicator_color(&page.status.indicator)))
}

#[derive(Debug, Deserialize)]
struct IsItUp {
    status_code: i64,
}

async fn check_website(fetcher: &dyn Fetcher, domain: &str) -> Result<Attachment, PluginError> {
    let url = format!("{}{}.json", WEBSITE_CHECK, urlencoding::encode(domain));
    let fetched = fetcher.get(&url).await?;
    if !fetched.is_success() {
        return Err(PluginError::Network(format!("isitup returned {}", fetched.status)));
    }
    let result: IsItUp = fetched.json()?;
    let attach = Attachment::new(domain);
    match result.status_code {
        1 => Ok(attach.with_color("good").with_text(":thumbsup:")),
        2 => Ok(attach.with_color("danger").with_text(":thumbsdown:")),
        _ => Err(PluginError::InvalidData("Not a valid domain".to_string())),
    }
}
