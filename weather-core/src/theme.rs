use serde::{Deserialize, Serialize};
use std::fmt;

/// Background/animation family picked from a condition label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ThemeCategory {
    #[default]
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
}

const SUNNY: &[&str] = &["Clear Sky", "Sunny", "Clear"];
const CLOUDY: &[&str] = &["Partly Clouds", "Clouds", "Overcast", "Mist", "Foggy", "Smoke"];
const RAINY: &[&str] = &["Light Rain", "Drizzle", "Moderate Rain", "Showers", "Heavy Rain"];
const SNOWY: &[&str] = &["Light Snow", "Moderate Snow", "Heavy Snow", "Blizzard"];

/// Map a condition label to a theme.
///
/// Matching is exact and case-sensitive. Anything outside the known labels,
/// including the provider's own "Rain" or "Snow", falls back to
/// [`ThemeCategory::Sunny`].
pub fn classify(condition_label: &str) -> ThemeCategory {
    if SUNNY.contains(&condition_label) {
        ThemeCategory::Sunny
    } else if CLOUDY.contains(&condition_label) {
        ThemeCategory::Cloudy
    } else if RAINY.contains(&condition_label) {
        ThemeCategory::Rainy
    } else if SNOWY.contains(&condition_label) {
        ThemeCategory::Snowy
    } else {
        ThemeCategory::default()
    }
}

impl ThemeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeCategory::Sunny => "sunny",
            ThemeCategory::Cloudy => "cloudy",
            ThemeCategory::Rainy => "rainy",
            ThemeCategory::Snowy => "snowy",
        }
    }

    /// Background drawable shown behind the reading.
    pub fn background(&self) -> &'static str {
        match self {
            ThemeCategory::Sunny => "sunny_background",
            ThemeCategory::Cloudy => "cloud_background",
            ThemeCategory::Rainy => "rain_background",
            ThemeCategory::Snowy => "snow_background",
        }
    }

    /// Animation played on top of the background.
    pub fn animation(&self) -> &'static str {
        match self {
            ThemeCategory::Sunny => "sun",
            ThemeCategory::Cloudy => "cloud",
            ThemeCategory::Rainy => "rain",
            ThemeCategory::Snowy => "snow",
        }
    }
}

impl fmt::Display for ThemeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
