//! Weather plugin - Current weather and forecasts from OpenWeatherMap

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, Utc};
use serde::Deserialize;

use crate::application::errors::{ConfigError, PluginError};
use crate::domain::entities::{Attachment, Catalog, Field, Response};
use crate::domain::traits::{Fetcher, Invocation, Plugin};
use crate::infrastructure::config::{plugin_config, ConfigSource};

pub const NAME: &str = "weather";
const SOURCE: &str = "https://api.openweathermap.org/data/2.5/";

/// `weather` configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WeatherConfig {
    pub api_token: String,
    #[serde(default)]
    pub default_city: String,
    #[serde(default = "default_units")]
    pub units: String,
}

fn default_units() -> String {
    "metric".to_string()
}

pub struct WeatherPlugin {
    catalog: Catalog,
    config: WeatherConfig,
    fetcher: Arc<dyn Fetcher>,
    source: String,
}

impl WeatherPlugin {
    pub fn new(catalog: Catalog, config: WeatherConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            catalog,
            config,
            fetcher,
            source: SOURCE.to_string(),
        }
    }

    pub fn from_config(source: &dyn ConfigSource, fetcher: Arc<dyn Fetcher>) -> Result<Self, ConfigError> {
        let config: WeatherConfig = plugin_config(source, NAME)?;
        if config.api_token.trim().is_empty() {
            return Err(ConfigError::invalid(NAME, "api-token is empty"));
        }
        Ok(Self::new(source.catalog(NAME), config, fetcher))
    }

    fn city(&self, invocation: &Invocation<'_>) -> String {
        let city = match invocation.argument() {
            "" => self.config.default_city.as_str(),
            given => given,
        };
        urlencoding::encode(city).into_owned()
    }

    async fn handle_weather(&self, invocation: &Invocation<'_>) -> Result<Response, PluginError> {
        let url = format!(
            "{}find?APPID={}&q={}&units={}",
            self.source,
            self.config.api_token,
            self.city(invocation),
            self.config.units
        );
        let result: WeatherResult = self.fetch(&url).await?;

        let now = Utc::now();
        let mut response = Response::new(invocation.text("response_text"));
        for record in result.list {
            let conditions = record.weather.first().cloned().unwrap_or_default();
            let mut attach = Attachment::new(format!(
                "{}, {} ({})",
                record.name,
                record.sys.country,
                rough_day(record.date, now)
            ))
            .with_text(conditions.description)
            .with_thumb(icon_url(&conditions.icon));
            attach.add_field(Field::short(invocation.text("temperature"), format_temp(record.main.temp, &self.config.units)));
            attach.add_field(Field::short(invocation.text("wind"), format_wind(record.wind.speed, &self.config.units)));
            attach.add_field(Field::short(invocation.text("humidity"), format!("{}%", record.main.humidity)));
            response.add_attachment(attach);
        }
        Ok(response)
    }

    async fn handle_forecast(&self, invocation: &Invocation<'_>) -> Result<Response, PluginError> {
        let url = format!(
            "{}forecast/daily?APPID={}&q={}&units={}",
            self.source,
            self.config.api_token,
            self.city(invocation),
            self.config.units
        );
        let result: ForecastResult = self.fetch(&url).await?;

        let now = Utc::now();
        let mut response = Response::new(invocation.text("response_text"));
        for record in result.list {
            let conditions = record.weather.first().cloned().unwrap_or_default();
            let mut attach = Attachment::new(format!(
                "{}, {} ({})",
                result.city.name,
                result.city.country,
                rough_day(record.date, now)
            ))
            .with_text(conditions.description)
            .with_thumb(icon_url(&conditions.icon));
            attach.add_field(Field::short(invocation.text("min_temperature"), format_temp(record.temp.min, &self.config.units)));
            attach.add_field(Field::short(invocation.text("max_temperature"), format_temp(record.temp.max, &self.config.units)));
            attach.add_field(Field::short(invocation.text("wind"), format_wind(record.speed, &self.config.units)));
            attach.add_field(Field::short(invocation.text("humidity"), format!("{}%", record.humidity)));
            response.add_attachment(attach);
        }
        Ok(response)
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, PluginError> {
        let fetched = self.fetcher.get(url).await?;
        if !fetched.is_success() {
            return Err(PluginError::Network(format!("OpenWeatherMap returned {}", fetched.status)));
        }
        fetched.json()
    }
}

#[async_trait]
impl Plugin for WeatherPlugin {
    fn name(&self) -> &str {
        NAME
    }

    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    async fn execute(&self, invocation: &Invocation<'_>) -> Result<Response, PluginError> {
        match invocation.command() {
            "weather" => self.handle_weather(invocation).await,
            "forecast" => self.handle_forecast(invocation).await,
            other => Err(PluginError::no_match(other)),
        }
    }
}

/// Rough human approximation of a unix timestamp relative to `now`:
/// within an hour is "Now", the same day "Today", the next day "Tomorrow",
/// anything else the weekday
pub fn rough_day(timestamp: i64, now: DateTime<Utc>) -> String {
    let Some(date) = DateTime::<Utc>::from_timestamp(timestamp, 0) else {
        return String::new();
    };
    if (date - now).num_seconds().abs() < 3600 {
        return "Now".to_string();
    }
    if date.date_naive() == now.date_naive() {
        return "Today".to_string();
    }
    if date.date_naive() == (now + Duration::days(1)).date_naive() {
        return "Tomorrow".to_string();
    }
    date.weekday().to_string()
}

fn icon_url(code: &str) -> String {
    format!("https://openweathermap.org/img/w/{}.png", code)
}

fn format_temp(temp: f64, units: &str) -> String {
    let unit = match units {
        "metric" => "C",
        "imperial" => "F",
        _ => "K",
    };
    format!("{:.0} {}", temp, unit)
}

fn format_wind(speed: f64, units: &str) -> String {
    let unit = match units {
        "imperial" => "mph",
        _ => "m/s",
    };
    format!("{:.0} {}", speed, unit)
}

#[derive(Debug, Deserialize)]
struct WeatherResult {
    #[serde(default)]
    list: Vec<WeatherRecord>,
}

#[derive(Debug, Deserialize)]
struct WeatherRecord {
    name: String,
    main: MainValues,
    wind: Wind,
    sys: Sys,
    #[serde(default)]
    weather: Vec<Conditions>,
    #[serde(rename = "dt")]
    date: i64,
}

#[derive(Debug, Deserialize)]
struct MainValues {
    temp: f64,
    humidity: i64,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct Sys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Conditions {
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResult {
    city: City,
    #[serde(default)]
    list: Vec<ForecastRecord>,
}

#[derive(Debug, Deserialize)]
struct City {
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct ForecastRecord {
    temp: Temperatures,
    #[serde(default)]
    weather: Vec<Conditions>,
    #[serde(rename = "dt")]
    date: i64,
    speed: f64,
    humidity: i64,
}

#[derive(Debug, Deserialize)]
struct Temperatures {
    min: f64,
    max: f64,
}
