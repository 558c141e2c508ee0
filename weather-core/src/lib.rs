//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client and reverse geocoder
//! - Presentation of a reading into display labels
//! - Classification of condition labels into themes
//! - The service that sequences a lookup end to end
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod geocoder;
pub mod model;
pub mod presenter;
pub mod provider;
pub mod service;
pub mod theme;

pub use config::Config;
pub use error::WeatherError;
pub use geocoder::{Geocoder, OpenWeatherGeocoder};
pub use model::{Coordinates, DisplayWeather, Units, WeatherQuery, WeatherReading};
pub use presenter::present;
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use service::WeatherService;
pub use theme::{ThemeCategory, classify};
