use crate::{Config, WeatherError, WeatherQuery, WeatherReading, provider::openweather::OpenWeatherProvider};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};

pub mod openweather;

/// Source of current weather readings.
///
/// Each call is one outbound request: no caching, no retries, no
/// deduplication of identical in-flight queries.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherReading, WeatherError>;
}

/// Build the shared HTTP client, applying the optional request timeout.
pub fn http_client(timeout: Option<Duration>) -> anyhow::Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().context("Failed to build HTTP client")
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(
    config: &Config,
    http: Client,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;
    Ok(Box::new(OpenWeatherProvider::with_client(api_key, http)))
}
