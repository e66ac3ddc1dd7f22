//! HTTP backend for SmartWeather.
//!
//! Serves `/api/weather`, `/api/forecast`, `/api/alerts`, `/api/forecast/daily`
//! and `/api/cities`, relaying provider JSON through a [`QueryForwarder`].

use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use weather_core::{CityIndex, Config, QueryForwarder, WeatherProvider, provider_from_config};

mod routes;

/// Shared, read-only state handed to every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub forwarder: QueryForwarder,
    pub cities: Arc<CityIndex>,
}

impl AppState {
    pub fn new(provider: Arc<dyn WeatherProvider>, cities: CityIndex) -> Self {
        Self {
            forwarder: QueryForwarder::new(provider),
            cities: Arc::new(cities),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let provider: Arc<dyn WeatherProvider> = Arc::from(provider_from_config(config)?);
        let cities = config.city_index()?;
        Ok(Self::new(provider, cities))
    }
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", routes::router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(config: Config) -> Result<()> {
    let state = AppState::from_config(&config)?;
    tracing::info!(cities = state.cities.len(), "loaded city list");

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app(state))
        .await
        .context("Server terminated unexpectedly")
}
