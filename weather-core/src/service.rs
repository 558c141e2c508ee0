//! Drives a lookup from a city name (or a location fix) to a [`DisplayWeather`].

use chrono::{DateTime, Local, TimeZone};
use std::{fmt::Display, sync::Arc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{
    Config, WeatherError,
    geocoder::{Geocoder, geocoder_from_config},
    model::{Coordinates, DisplayWeather, Units, WeatherQuery},
    presenter::present,
    provider::{WeatherProvider, http_client, provider_from_config},
};

pub const NO_LOCATION_FIX: &str = "Unable to fetch location.";
pub const NO_LOCALITY: &str = "Unable to determine city name.";

#[derive(Debug)]
pub struct WeatherService {
    provider: Box<dyn WeatherProvider>,
    geocoder: Box<dyn Geocoder>,
    units: Units,
}

impl WeatherService {
    pub fn new(provider: Box<dyn WeatherProvider>, geocoder: Box<dyn Geocoder>) -> Self {
        Self {
            provider,
            geocoder,
            units: Units::default(),
        }
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    /// Wire up the OpenWeather provider and geocoder sharing one HTTP client.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = http_client(config.timeout())?;
        let provider = provider_from_config(config, http.clone())?;
        let geocoder = geocoder_from_config(config, http)?;
        Ok(Self::new(provider, geocoder).with_units(config.units))
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// Look up `city_name`, labelling times in the local timezone.
    pub async fn handle(&self, city_name: &str) -> Result<DisplayWeather, WeatherError> {
        self.handle_at(city_name, &Local::now()).await
    }

    pub async fn handle_at<Tz>(
        &self,
        city_name: &str,
        now: &DateTime<Tz>,
    ) -> Result<DisplayWeather, WeatherError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let query = WeatherQuery::new(city_name, self.units);
        let reading = self.provider.fetch(&query).await?;
        let weather = present(&reading, city_name, now);
        debug!(city = %weather.city_name, theme = %weather.theme, "weather ready");
        Ok(weather)
    }

    /// Look up weather for a device location fix. `None` means no fix was obtained.
    pub async fn handle_location(
        &self,
        fix: Option<Coordinates>,
    ) -> Result<DisplayWeather, WeatherError> {
        self.handle_location_at(fix, &Local::now()).await
    }

    pub async fn handle_location_at<Tz>(
        &self,
        fix: Option<Coordinates>,
        now: &DateTime<Tz>,
    ) -> Result<DisplayWeather, WeatherError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let city_name = self.resolve_locality(fix).await?;
        self.handle_at(&city_name, now).await
    }

    /// Resolve a fix to a locality. Every failure is `LocationUnavailable`.
    pub async fn resolve_locality(&self, fix: Option<Coordinates>) -> Result<String, WeatherError> {
        let coords = fix
            .filter(Coordinates::is_valid)
            .ok_or_else(|| WeatherError::location(NO_LOCATION_FIX))?;

        match self.geocoder.locality(coords).await {
            Ok(Some(name)) => {
                debug!(locality = %name, "resolved location");
                Ok(name)
            }
            Ok(None) => Err(WeatherError::location(NO_LOCALITY)),
            Err(e) => {
                warn!("Reverse geocoding failed: {e:#}");
                Err(WeatherError::location(NO_LOCALITY))
            }
        }
    }

    /// Run [`handle`](Self::handle) on the runtime without waiting for it.
    ///
    /// Overlapping dispatches are neither deduplicated nor cancelled.
    pub fn dispatch(
        self: &Arc<Self>,
        city_name: String,
    ) -> JoinHandle<Result<DisplayWeather, WeatherError>> {
        let service = Arc::clone(self);
        tokio::spawn(async move { service.handle(&city_name).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::WeatherReading, provider::openweather::OpenWeatherProvider, theme::ThemeCategory,
    };
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::Mutex;
    use tracing_subscriber::util::SubscriberInitExt;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    #[derive(Debug, Default)]
    struct StubProvider {
        fail: bool,
        queries: Arc<Mutex<Vec<WeatherQuery>>>,
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherReading, WeatherError> {
            self.queries.lock().unwrap().push(query.clone());
            if self.fail {
                return Err(WeatherError::network("status 500"));
            }
            Ok(WeatherReading {
                temperature: 23.5,
                temp_min: 20.0,
                temp_max: 25.0,
                humidity: 40,
                pressure: 1012,
                wind_speed: 1.5,
                sunrise: 1_700_000_000,
                sunset: 1_700_040_000,
                condition_label: "Drizzle".to_string(),
                units: query.units,
            })
        }
    }

    #[derive(Debug)]
    enum StubGeocoder {
        Found(&'static str),
        Nothing,
        Broken,
    }

    #[async_trait]
    impl Geocoder for StubGeocoder {
        async fn locality(&self, _coords: Coordinates) -> anyhow::Result<Option<String>> {
            match self {
                StubGeocoder::Found(name) => Ok(Some(name.to_string())),
                StubGeocoder::Nothing => Ok(None),
                StubGeocoder::Broken => Err(anyhow!("geocoder offline")),
            }
        }
    }

    fn service(provider: StubProvider, geocoder: StubGeocoder) -> WeatherService {
        WeatherService::new(Box::new(provider), Box::new(geocoder))
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn handle_builds_metric_query_and_presents() {
        let queries = Arc::new(Mutex::new(Vec::new()));
        let provider = StubProvider { fail: false, queries: queries.clone() };
        let svc = service(provider, StubGeocoder::Nothing);

        let display = svc.handle_at("Pune", &now()).await.unwrap();

        assert_eq!(display.temperature_rounded, 24);
        assert_eq!(display.city_name, "Pune");
        assert_eq!(display.theme, ThemeCategory::Rainy);
        assert_eq!(display.day_label, "Friday");
        assert_eq!(
            queries.lock().unwrap().as_slice(),
            &[WeatherQuery::new("Pune", Units::Metric)]
        );
    }

    #[tokio::test]
    async fn handle_logs_at_debug_level() {
        let _guard = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .set_default();
        let svc = service(StubProvider::default(), StubGeocoder::Found("Surat"));

        let weather = svc
            .handle_location_at(Some(Coordinates::new(21.17, 72.83)), &now())
            .await
            .unwrap();
        assert_eq!(weather.city_name, "Surat");
        assert_eq!(weather.theme, ThemeCategory::Rainy);
    }

    #[tokio::test]
    async fn configured_units_are_forwarded() {
        let queries = Arc::new(Mutex::new(Vec::new()));
        let provider = StubProvider { fail: false, queries: queries.clone() };
        let svc = service(provider, StubGeocoder::Nothing).with_units(Units::Imperial);

        let display = svc.handle_at("Austin", &now()).await.unwrap();

        assert_eq!(display.temp_max_label, "Max : 25.0 °F");
        assert_eq!(queries.lock().unwrap()[0].units, Units::Imperial);
    }

    #[tokio::test]
    async fn provider_errors_pass_through_unchanged() {
        let provider = StubProvider { fail: true, ..Default::default() };
        let svc = service(provider, StubGeocoder::Nothing);

        let err = svc.handle_at("Pune", &now()).await.unwrap_err();
        assert!(matches!(err, WeatherError::Network(ref m) if m == "status 500"));
    }

    #[tokio::test]
    async fn location_path_uses_resolved_locality() {
        let queries = Arc::new(Mutex::new(Vec::new()));
        let provider = StubProvider { fail: false, queries: queries.clone() };
        let svc = service(provider, StubGeocoder::Found("Surat"));

        let display = svc
            .handle_location_at(Some(Coordinates::new(21.17, 72.83)), &now())
            .await
            .unwrap();

        assert_eq!(display.city_name, "Surat");
        assert_eq!(queries.lock().unwrap()[0].city_name, "Surat");
    }

    #[tokio::test]
    async fn no_locality_is_location_unavailable() {
        let queries = Arc::new(Mutex::new(Vec::new()));
        let provider = StubProvider { fail: false, queries: queries.clone() };
        let svc = service(provider, StubGeocoder::Nothing);

        let err = svc
            .handle_location_at(Some(Coordinates::new(0.0, -160.0)), &now())
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::LocationUnavailable(_)));
        assert_eq!(err.user_message(), NO_LOCALITY);
        assert!(queries.lock().unwrap().is_empty(), "no weather request without a city");
    }

    #[tokio::test]
    async fn geocoder_failure_is_location_unavailable() {
        let svc = service(StubProvider::default(), StubGeocoder::Broken);

        let err = svc
            .handle_location_at(Some(Coordinates::new(10.0, 10.0)), &now())
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherError::LocationUnavailable(_)));
    }

    #[tokio::test]
    async fn missing_or_invalid_fix_is_location_unavailable() {
        let svc = service(StubProvider::default(), StubGeocoder::Found("Surat"));

        let err = svc.resolve_locality(None).await.unwrap_err();
        assert_eq!(err.user_message(), NO_LOCATION_FIX);

        let err = svc
            .resolve_locality(Some(Coordinates::new(120.0, 0.0)))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), NO_LOCATION_FIX);
    }

    #[tokio::test]
    async fn overlapping_dispatches_all_complete() {
        let queries = Arc::new(Mutex::new(Vec::new()));
        let provider = StubProvider { fail: false, queries: queries.clone() };
        let svc = Arc::new(service(provider, StubGeocoder::Nothing));

        let first = svc.dispatch("Surat".to_string());
        let second = svc.dispatch("Surat".to_string());

        assert_eq!(first.await.unwrap().unwrap().city_name, "Surat");
        assert_eq!(second.await.unwrap().unwrap().city_name, "Surat");
        assert_eq!(queries.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn end_to_end_against_stub_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Surat"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "main": { "temp": 30.2, "temp_min": 29.0, "temp_max": 31.5, "humidity": 62, "pressure": 1008 },
                "wind": { "speed": 3.6 },
                "weather": [{ "main": "Clear Sky" }],
                "sys": { "sunrise": 1700000000, "sunset": 1700040000 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::new("KEY".into()).with_base_url(server.uri());
        let svc = WeatherService::new(Box::new(provider), Box::new(StubGeocoder::Nothing));

        let display = svc.handle_at("Surat", &now()).await.unwrap();
        assert_eq!(display.temperature_rounded, 30);
        assert_eq!(display.theme, ThemeCategory::Sunny);
        assert_eq!(display.city_name, "Surat");
    }

    #[tokio::test]
    async fn end_to_end_server_error_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::new("KEY".into()).with_base_url(server.uri());
        let svc = WeatherService::new(Box::new(provider), Box::new(StubGeocoder::Nothing));

        let err = svc.handle_at("Surat", &now()).await.unwrap_err();
        assert!(matches!(err, WeatherError::Network(_)));
    }

    #[test]
    fn from_config_uses_configured_units() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.units = Units::Standard;

        let svc = WeatherService::from_config(&cfg).unwrap();
        assert_eq!(svc.units(), Units::Standard);
    }
}
