use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::WeatherError,
    model::{Coordinates, CurrentConditions, ForecastEntry, LocationQuery, WeatherAlert},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const CURRENT_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";
const ONECALL_PATH: &str = "/data/3.0/onecall";

/// Everything but alerts is excluded from the One Call response.
const ALERTS_EXCLUDE: &str = "minutely,hourly,daily,current";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn fetch_json(
        &self,
        endpoint: &'static str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Value, WeatherError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(endpoint, %url, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| WeatherError::Request { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| WeatherError::Request { endpoint, source })?;

        if !status.is_success() {
            warn!(endpoint, status = status.as_u16(), "OpenWeather returned an error status");
            return Err(WeatherError::Status {
                endpoint,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| WeatherError::Decode { endpoint, source })
    }

    fn metric_params(query: &LocationQuery) -> Vec<(&'static str, String)> {
        let mut params = query.query_pairs();
        params.push(("units", "metric".to_string()));
        params
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, query: &LocationQuery) -> Result<Value, WeatherError> {
        self.fetch_json("weather", CURRENT_PATH, &Self::metric_params(query))
            .await
    }

    async fn forecast(&self, query: &LocationQuery) -> Result<Value, WeatherError> {
        self.fetch_json("forecast", FORECAST_PATH, &Self::metric_params(query))
            .await
    }

    async fn alerts(&self, coords: Coordinates) -> Result<Value, WeatherError> {
        let params = [
            ("lat", coords.lat.to_string()),
            ("lon", coords.lon.to_string()),
            ("exclude", ALERTS_EXCLUDE.to_string()),
        ];

        let mut body = self.fetch_json("onecall", ONECALL_PATH, &params).await?;

        match body.get_mut("alerts").map(Value::take) {
            Some(alerts) if !alerts.is_null() => Ok(alerts),
            _ => Ok(Value::Array(Vec::new())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    #[serde(default)]
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

impl From<OwForecastEntry> for ForecastEntry {
    fn from(e: OwForecastEntry) -> Self {
        Self {
            timestamp: e.dt,
            date: e.dt_txt,
            temperature_c: e.main.temp,
            feels_like_c: e.main.feels_like,
            humidity_pct: e.main.humidity,
            wind_speed_mps: e.wind.speed,
            condition: first_description(e.weather),
        }
    }
}

fn first_description(weather: Vec<OwWeather>) -> String {
    weather
        .into_iter()
        .next()
        .map(|w| w.description)
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Extract the forecast samples from a `/forecast` payload, in feed order.
pub fn parse_forecast_entries(payload: &Value) -> Result<Vec<ForecastEntry>, WeatherError> {
    let parsed = OwForecastResponse::deserialize(payload).map_err(|source| WeatherError::Decode {
        endpoint: "forecast",
        source,
    })?;

    Ok(parsed.list.into_iter().map(ForecastEntry::from).collect())
}

/// Extract display fields from a `/weather` payload.
pub fn parse_current(payload: &Value) -> Result<CurrentConditions, WeatherError> {
    let parsed = OwCurrentResponse::deserialize(payload).map_err(|source| WeatherError::Decode {
        endpoint: "weather",
        source,
    })?;

    let observation_time = DateTime::from_timestamp(parsed.dt, 0).unwrap_or_else(Utc::now);

    Ok(CurrentConditions {
        location_name: parsed.name,
        temperature_c: parsed.main.temp,
        feels_like_c: parsed.main.feels_like,
        condition: first_description(parsed.weather),
        humidity_pct: parsed.main.humidity,
        wind_speed_mps: parsed.wind.speed,
        observation_time,
    })
}

/// Parse the array returned by [`WeatherProvider::alerts`].
pub fn parse_alerts(payload: &Value) -> Result<Vec<WeatherAlert>, WeatherError> {
    Vec::<WeatherAlert>::deserialize(payload).map_err(|source| WeatherError::Decode {
        endpoint: "onecall",
        source,
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
