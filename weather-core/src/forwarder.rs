//! Validates location parameters and relays them to the weather provider.

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

use crate::{
    error::WeatherError,
    forecast::aggregate_daily,
    model::{Coordinates, DailySummary, LocationQuery},
    provider::{WeatherProvider, openweather::parse_forecast_entries},
};

/// Raw location parameters as they arrive in a query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationParams {
    pub city: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl LocationParams {
    pub fn city(name: impl Into<String>) -> Self {
        Self {
            city: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn to_query(&self) -> Result<LocationQuery, WeatherError> {
        LocationQuery::from_params(
            self.city.as_deref(),
            self.lat.as_deref(),
            self.lon.as_deref(),
        )
    }

    pub fn to_coordinates(&self) -> Result<Coordinates, WeatherError> {
        Coordinates::from_params(self.lat.as_deref(), self.lon.as_deref())
    }
}

impl From<Coordinates> for LocationParams {
    fn from(c: Coordinates) -> Self {
        Self {
            city: None,
            lat: Some(c.lat.to_string()),
            lon: Some(c.lon.to_string()),
        }
    }
}

/// One outbound provider call per operation; no retries, no caching.
#[derive(Debug, Clone)]
pub struct QueryForwarder {
    provider: Arc<dyn WeatherProvider>,
}

impl QueryForwarder {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    pub async fn weather(&self, params: &LocationParams) -> Result<Value, WeatherError> {
        let query = params.to_query()?;
        self.provider
            .current(&query)
            .await
            .inspect_err(|err| error!(%err, "Error fetching weather data"))
    }

    pub async fn forecast(&self, params: &LocationParams) -> Result<Value, WeatherError> {
        let query = params.to_query()?;
        self.provider
            .forecast(&query)
            .await
            .inspect_err(|err| error!(%err, "Error fetching forecast data"))
    }

    /// Forecast reduced to one entry per day.
    pub async fn daily_forecast(
        &self,
        params: &LocationParams,
    ) -> Result<Vec<DailySummary>, WeatherError> {
        let payload = self.forecast(params).await?;
        let entries = parse_forecast_entries(&payload)
            .inspect_err(|err| error!(%err, "Error reading forecast data"))?;

        Ok(aggregate_daily(entries))
    }

    /// Alerts need coordinates; a city alone is not enough.
    pub async fn alerts(&self, params: &LocationParams) -> Result<Value, WeatherError> {
        let coords = params.to_coordinates()?;
        self.provider
            .alerts(coords)
            .await
            .inspect_err(|err| error!(%err, "Error fetching alerts"))
    }
}
