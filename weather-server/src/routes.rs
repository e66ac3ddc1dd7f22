use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use weather_core::{City, DailySummary, LocationParams, WeatherError};

use crate::AppState;

const WEATHER_FAILURE: &str = "Failed to fetch weather data.";
const FORECAST_FAILURE: &str = "Failed to fetch forecast data.";
const ALERTS_FAILURE: &str = "Failed to fetch alerts.";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather", get(get_weather))
        .route("/forecast", get(get_forecast))
        .route("/forecast/daily", get(get_daily_forecast))
        .route("/alerts", get(get_alerts))
        .route("/cities", get(get_cities))
        .with_state(state)
}

/// JSON error body: `{"error": "..."}`.
///
/// Upstream failures carry a fixed message; provider detail only goes to the log.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Malformed query strings, e.g. a repeated `city`, still get a JSON body.
    fn bad_query(rejection: QueryRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
        }
    }

    fn or_failure(failure: &'static str) -> impl FnOnce(WeatherError) -> Self {
        move |err| match err {
            WeatherError::Validation(message) => Self {
                status: StatusCode::BAD_REQUEST,
                message,
            },
            _ => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: failure.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

async fn get_weather(
    State(state): State<AppState>,
    params: Result<Query<LocationParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params.map_err(ApiError::bad_query)?;
    let body = state
        .forwarder
        .weather(&params)
        .await
        .map_err(ApiError::or_failure(WEATHER_FAILURE))?;
    Ok(Json(body))
}

async fn get_forecast(
    State(state): State<AppState>,
    params: Result<Query<LocationParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params.map_err(ApiError::bad_query)?;
    let body = state
        .forwarder
        .forecast(&params)
        .await
        .map_err(ApiError::or_failure(FORECAST_FAILURE))?;
    Ok(Json(body))
}

async fn get_daily_forecast(
    State(state): State<AppState>,
    params: Result<Query<LocationParams>, QueryRejection>,
) -> Result<Json<Vec<DailySummary>>, ApiError> {
    let Query(params) = params.map_err(ApiError::bad_query)?;
    let days = state
        .forwarder
        .daily_forecast(&params)
        .await
        .map_err(ApiError::or_failure(FORECAST_FAILURE))?;
    Ok(Json(days))
}

async fn get_alerts(
    State(state): State<AppState>,
    params: Result<Query<LocationParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params.map_err(ApiError::bad_query)?;
    let alerts = state
        .forwarder
        .alerts(&params)
        .await
        .map_err(ApiError::or_failure(ALERTS_FAILURE))?;
    Ok(Json(alerts))
}

#[derive(Debug, Deserialize)]
struct CitySearch {
    #[serde(default)]
    q: String,
}

async fn get_cities(
    State(state): State<AppState>,
    search: Result<Query<CitySearch>, QueryRejection>,
) -> Result<Json<Vec<City>>, ApiError> {
    let Query(search) = search.map_err(ApiError::bad_query)?;
    Ok(Json(
        state.cities.suggest(&search.q).into_iter().cloned().collect(),
    ))
}
