//! Xkcd plugin - Latest, random or specific XKCD comics

use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;

use crate::application::errors::PluginError;
use crate::domain::entities::{Attachment, Catalog, Response};
use crate::domain::traits::{Fetcher, Invocation, Plugin};
use crate::infrastructure::config::ConfigSource;

pub const NAME: &str = "xkcd";
const BASE_URL: &str = "https://xkcd.com/";

#[derive(Debug, Clone, Deserialize)]
struct Comic {
    #[serde(rename = "num")]
    number: u32,
    title: String,
    alt: String,
    img: String,
}

pub struct XkcdPlugin {
    catalog: Catalog,
    fetcher: Arc<dyn Fetcher>,
}

impl XkcdPlugin {
    pub fn new(catalog: Catalog, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { catalog, fetcher }
    }

    pub fn from_config(source: &dyn ConfigSource, fetcher: Arc<dyn Fetcher>) -> Self {
        Self::new(source.catalog(NAME), fetcher)
    }

    async fn comic(&self, number: Option<u32>) -> Result<Comic, PluginError> {
        let url = match number {
            Some(n) => format!("{}{}/info.0.json", BASE_URL, n),
            None => format!("{}info.0.json", BASE_URL),
        };
        let fetched = self.fetcher.get(&url).await?;
        if fetched.status == 404 {
            return Err(PluginError::InvalidData("Incorrect comic number".to_string()));
        }
        if !fetched.is_success() {
            return Err(PluginError::Network(format!("xkcd returned {}", fetched.status)));
        }
        fetched.json()
    }

    async fn random_comic(&self) -> Result<Comic, PluginError> {
        let latest = self.comic(None).await?;
        if latest.number <= 1 {
            return Ok(latest);
        }
        let number = rand::thread_rng().gen_range(1..=latest.number);
        self.comic(Some(number)).await
    }

    fn respond(&self, invocation: &Invocation<'_>, comic: Comic) -> Response {
        let mut response = Response::new(format!(
            "{}{}",
            invocation.text_of("xkcd", "response_text"),
            comic.number
        ));
        response.set_public();
        response.add_attachment(Attachment::new(comic.title).with_text(comic.alt).with_image(comic.img));
        response
    }
}

#[async_trait]
impl Plugin for XkcdPlugin {
    fn name(&self) -> &str {
        NAME
    }

    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    async fn execute(&self, invocation: &Invocation<'_>) -> Result<Response, PluginError> {
        let comic = match (invocation.command(), invocation.argument()) {
            ("xkcd", _) | ("xkcd_specific", "") => self.comic(None).await?,
            ("xkcd_random", _) => self.random_comic().await?,
            ("xkcd_specific", number) => {
                let number = number
                    .parse::<u32>()
                    .map_err(|_| PluginError::InvalidData("Incorrect comic number".to_string()))?;
                self.comic(Some(number)).await?
            }
            (other, _) => return Err(PluginError::no_match(other)),
        };
        Ok(self.respond(invocation, comic))
    }
}
