//! Core library for SmartWeather.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider and the query forwarder in front of it
//! - Daily aggregation of the 3-hour forecast feed
//! - The static city list used for autocomplete
//!
//! It is used by `weather-server` and `weather-cli`.

pub mod cities;
pub mod config;
pub mod error;
pub mod forecast;
pub mod forwarder;
pub mod model;
pub mod provider;

pub use cities::{City, CityIndex};
pub use config::{Config, ServerConfig};
pub use error::WeatherError;
pub use forecast::{MAX_FORECAST_DAYS, aggregate_daily};
pub use forwarder::{LocationParams, QueryForwarder};
pub use model::{
    Coordinates, CurrentConditions, DailySummary, ForecastEntry, LocationQuery, WeatherAlert,
};
pub use provider::{WeatherProvider, provider_from_config};
