use thiserror::Error;

/// Message returned when a location query carries neither a city nor coordinates.
pub const MISSING_LOCATION: &str = "Please provide city or latitude and longitude.";

/// Message returned when an alerts query lacks coordinates.
pub const MISSING_COORDINATES: &str = "Latitude and longitude are required.";

/// Errors produced while validating a query or talking to the provider.
///
/// Only [`WeatherError::Validation`] is meant to be shown to the caller.
/// Everything else is an upstream failure whose detail stays in the logs.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("{0}")]
    Validation(String),

    #[error("request to OpenWeather {endpoint} endpoint failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("OpenWeather {endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("failed to decode OpenWeather {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl WeatherError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = WeatherError::validation(MISSING_LOCATION);
        assert!(err.is_validation());
        assert_eq!(err.to_string(), MISSING_LOCATION);
    }

    #[test]
    fn status_error_is_not_validation() {
        let err = WeatherError::Status {
            endpoint: "weather",
            status: 401,
            body: "Invalid API key".into(),
        };

        assert!(!err.is_validation());
        assert!(err.to_string().contains("401"));
    }
}
