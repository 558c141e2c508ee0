//! Failures that end a single weather lookup.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    /// Transport failure, timeout or a non-2xx response.
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered with a body we could not decode.
    #[error("Parse error: {0}")]
    Parse(String),

    /// No location fix, or no locality for the fix.
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),
}

impl WeatherError {
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network(message.into())
    }

    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    pub fn location<S: Into<String>>(message: S) -> Self {
        Self::LocationUnavailable(message.into())
    }

    /// Short notification text for the user.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            WeatherError::Network(_) | WeatherError::Parse(_) => "Error!!!",
            WeatherError::LocationUnavailable(message) => message,
        }
    }
}
