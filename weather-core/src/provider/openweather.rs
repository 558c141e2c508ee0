use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    WeatherError,
    model::{WeatherQuery, WeatherReading},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Condition label used when the response carries no `weather[0].main`.
pub const UNKNOWN_CONDITION: &str = "unknown";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
    base_url: String,
}

impl OpenWeatherProvider {
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

    async fn fetch_current(&self, query: &WeatherQuery) -> Result<WeatherReading, WeatherError> {
        let url = format!("{}/data/2.5/weather", self.base_url.trim_end_matches('/'));
        debug!(city = %query.city_name, units = %query.units, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", query.city_name.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", query.units.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                WeatherError::network(format!("Failed to send request to OpenWeather: {e}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::network(format!("Failed to read OpenWeather response body: {e}"))
        })?;

        if !status.is_success() {
            return Err(WeatherError::network(format!(
                "OpenWeather request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::parse(format!("Failed to parse OpenWeather JSON: {e}")))?;

        let reading = parsed.into_reading(query);
        debug!(condition = %reading.condition_label, temp = reading.temperature, "received current weather");
        Ok(reading)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    #[serde(default)]
    weather: Option<Vec<OwWeather>>,
    wind: OwWind,
    sys: OwSys,
}

impl OwCurrentResponse {
    fn into_reading(self, query: &WeatherQuery) -> WeatherReading {
        let condition_label = self
            .weather
            .into_iter()
            .flatten()
            .next()
            .and_then(|w| w.main)
            .unwrap_or_else(|| UNKNOWN_CONDITION.to_string());

        WeatherReading {
            temperature: self.main.temp,
            temp_min: self.main.temp_min,
            temp_max: self.main.temp_max,
            humidity: self.main.humidity,
            pressure: self.main.pressure,
            wind_speed: self.wind.speed,
            sunrise: self.sys.sunrise,
            sunset: self.sys.sunset,
            condition_label,
            units: query.units,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherReading, WeatherError> {
        self.fetch_current(query).await
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
