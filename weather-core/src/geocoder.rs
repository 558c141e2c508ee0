//! Reverse geocoding: turn a location fix into a locality name.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use tracing::debug;

use crate::{
    Config,
    model::Coordinates,
    provider::openweather::{DEFAULT_BASE_URL, truncate_body},
};

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Locality for `coords`, or `None` when the service knows no place there.
    async fn locality(&self, coords: Coordinates) -> Result<Option<String>>;
}

/// OpenWeather's `geo/1.0/reverse` endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherGeocoder {
    api_key: String,
    http: Client,
    base_url: String,
}

impl OpenWeatherGeocoder {
    pub fn new(api_key: String) -> Self {
        Self::with_client(api_key, Client::new())
    }

    pub fn with_client(api_key: String, http: Client) -> Self {
        Self {
            api_key,
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct OwPlace {
    name: String,
}

#[async_trait]
impl Geocoder for OpenWeatherGeocoder {
    async fn locality(&self, coords: Coordinates) -> Result<Option<String>> {
        let url = format!("{}/geo/1.0/reverse", self.base_url.trim_end_matches('/'));
        debug!(lat = coords.latitude, lon = coords.longitude, "reverse geocoding");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("limit", "1".to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (reverse geocoding)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather geocoding response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather geocoding request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let places: Vec<OwPlace> =
            serde_json::from_str(&body).context("Failed to parse OpenWeather geocoding JSON")?;

        Ok(places
            .into_iter()
            .map(|place| place.name)
            .find(|name| !name.trim().is_empty()))
    }
}

/// Construct the OpenWeather geocoder from config.
pub fn geocoder_from_config(config: &Config, http: Client) -> Result<Box<dyn Geocoder>> {
    let api_key = config.api_key()?;
    Ok(Box::new(OpenWeatherGeocoder::with_client(api_key, http)))
}
