//! Turns a [`WeatherReading`] into display-ready labels.
//!
//! Times are rendered in the timezone of the `now` passed in; the CLI uses
//! `chrono::Local`, tests pin a fixed offset. Day and date come from `now`,
//! not from sunrise/sunset, because the provider reports no observation time
//! that the labels are meant to describe.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

use crate::{
    model::{DisplayWeather, WeatherReading},
    theme::classify,
};

const TIME_FORMAT: &str = "%H:%M";
const DAY_FORMAT: &str = "%A";
const DATE_FORMAT: &str = "%d %B %Y";
const MISSING_TIME: &str = "--:--";

pub fn present<Tz>(reading: &WeatherReading, city_name: &str, now: &DateTime<Tz>) -> DisplayWeather
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let temp_unit = reading.units.temperature_suffix();
    let tz = now.timezone();

    DisplayWeather {
        temperature_rounded: round_temperature(reading.temperature),
        temp_min_label: format!("Min : {:?} {temp_unit}", reading.temp_min),
        temp_max_label: format!("Max : {:?} {temp_unit}", reading.temp_max),
        humidity_label: format!("{} %", reading.humidity),
        wind_label: format!("{:?} {}", reading.wind_speed, reading.units.wind_suffix()),
        sunrise_label: clock_label(reading.sunrise, &tz),
        sunset_label: clock_label(reading.sunset, &tz),
        pressure_label: format!("{} hPa", reading.pressure),
        day_label: now.format(DAY_FORMAT).to_string(),
        date_label: now.format(DATE_FORMAT).to_string(),
        city_name: city_name.to_string(),
        condition: reading.condition_label.clone(),
        theme: classify(&reading.condition_label),
    }
}

/// Nearest integer, halves away from zero. Out-of-range values saturate.
pub fn round_temperature(temperature: f64) -> i32 {
    temperature.round() as i32
}

fn clock_label<Tz>(unix_seconds: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    DateTime::from_timestamp(unix_seconds, 0)
        .map(|utc| utc.with_timezone(tz).format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| MISSING_TIME.to_string())
}
