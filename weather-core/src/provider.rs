use crate::{
    Config,
    error::WeatherError,
    model::{Coordinates, LocationQuery},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

pub mod openweather;

/// Source of raw weather payloads.
///
/// Implementations return the provider JSON untouched so it can be relayed
/// to callers as-is.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, query: &LocationQuery) -> Result<Value, WeatherError>;

    async fn forecast(&self, query: &LocationQuery) -> Result<Value, WeatherError>;

    /// Active alerts for a point, as a JSON array (empty when none).
    async fn alerts(&self, coords: Coordinates) -> Result<Value, WeatherError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `weather configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let provider = match &config.base_url {
        Some(base_url) => OpenWeatherProvider::with_base_url(api_key.to_owned(), base_url),
        None => OpenWeatherProvider::new(api_key.to_owned()),
    };

    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No OpenWeather API key configured"));
        assert!(msg.contains("Hint: run `weather configure`"));
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());
        cfg.base_url = Some("http://127.0.0.1:9".into());

        let provider = provider_from_config(&cfg);
        assert!(provider.is_ok());
    }
}
