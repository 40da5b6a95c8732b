//! Tumblr plugin - Random images from configured Tumblr blogs

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use rand::seq::IteratorRandom;
use regex_lite::Regex;
use serde::Deserialize;

use crate::application::errors::{ConfigError, PluginError};
use crate::domain::entities::{catalog, Attachment, Catalog, Response};
use crate::domain::traits::{Fetcher, Invocation, Plugin};
use crate::infrastructure::config::{plugin_config, ConfigSource};

pub const NAME: &str = "tumblr";
const SECTION: &str = "randomtumblr";

/// A configured blog
#[derive(Debug, Clone, Deserialize)]
pub struct Blog {
    pub name: String,
    pub url: String,
}

pub struct TumblrPlugin {
    catalog: Catalog,
    blogs: BTreeMap<String, Blog>,
    fetcher: Arc<dyn Fetcher>,
    image: Regex,
}

impl TumblrPlugin {
    pub fn new(
        catalog: Catalog,
        blogs: BTreeMap<String, Blog>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self, ConfigError> {
        if blogs.is_empty() {
            return Err(ConfigError::invalid(SECTION, "no blogs configured"));
        }
        let image = Regex::new(r#"<img[^>]+src="([^"]+)""#)
            .map_err(|e| ConfigError::invalid(SECTION, e.to_string()))?;
        Ok(Self {
            catalog,
            blogs,
            fetcher,
            image,
        })
    }

    pub fn from_config(source: &dyn ConfigSource, fetcher: Arc<dyn Fetcher>) -> Result<Self, ConfigError> {
        let blogs: BTreeMap<String, Blog> = plugin_config(source, SECTION)?;
        Self::new(source.catalog(NAME), blogs, fetcher)
    }

    fn choose(&self, requested: &str) -> Option<&Blog> {
        if requested.is_empty() {
            return self.blogs.values().choose(&mut rand::thread_rng());
        }
        self.blogs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(requested))
            .map(|(_, blog)| blog)
    }

    async fn random_post(&self, blog: &Blog) -> Result<Attachment, PluginError> {
        let url = format!("{}/rss", blog.url.trim_end_matches('/'));
        let fetched = self.fetcher.get(&url).await?;
        if !fetched.is_success() {
            return Err(PluginError::Network(format!("{} returned {}", url, fetched.status)));
        }
        let channel = rss::Channel::read_from(fetched.body.as_bytes())
            .map_err(|e| PluginError::InvalidData(e.to_string()))?;

        let posts: Vec<(&rss::Item, &str)> = channel
            .items()
            .iter()
            .filter_map(|item| {
                let description = item.description()?;
                let image = self.image.captures(description)?.get(1)?.as_str();
                Some((item, image))
            })
            .collect();
        let (item, image) = posts
            .into_iter()
            .choose(&mut rand::thread_rng())
            .ok_or_else(|| PluginError::InvalidData("No image found".to_string()))?;

        let title = item
            .title()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&blog.name);
        let mut attach = Attachment::new(title).with_image(image);
        if let Some(link) = item.link() {
            attach = attach.with_title_link(link);
        }
        Ok(attach)
    }
}

#[async_trait]
impl Plugin for TumblrPlugin {
    fn name(&self) -> &str {
        NAME
    }

    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    async fn execute(&self, invocation: &Invocation<'_>) -> Result<Response, PluginError> {
        let requested = match invocation.command() {
            "tumblr" => "",
            "specifictumblr" => invocation.argument(),
            other => return Err(PluginError::no_match(other)),
        };
        let blog = self
            .choose(requested)
            .ok_or_else(|| PluginError::no_match(format!("unknown blog '{}'", requested)))?;

        let attach = self.random_post(blog).await?;
        let mut response = Response::new(blog.name.clone());
        response.set_public();
        response.add_attachment(attach);
        Ok(response)
    }

    /// One line per configured blog rather than the bare pattern
    fn describe(&self, language: &str) -> Vec<(String, String)> {
        let mut lines = Vec::new();
        if let Some(main) = self.catalog.command(language, "tumblr") {
            lines.push((main.command.clone(), main.description.clone()));
        }
        if let Some(specific) = self.catalog.command(language, "specifictumblr") {
            for (key, blog) in &self.blogs {
                lines.push((
                    catalog::fill(&specific.command, key),
                    catalog::fill(&specific.description, &blog.name),
                ));
            }
        }
        lines
    }
}
