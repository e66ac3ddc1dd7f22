use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MISSING_COORDINATES, MISSING_LOCATION, WeatherError};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build coordinates from raw query parameters. Both must be present and numeric.
    pub fn from_params(lat: Option<&str>, lon: Option<&str>) -> Result<Self, WeatherError> {
        match (present(lat), present(lon)) {
            (Some(lat), Some(lon)) => parse_pair(lat, lon),
            _ => Err(WeatherError::validation(MISSING_COORDINATES)),
        }
    }
}

/// What the provider should be asked about.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates(Coordinates),
}

impl LocationQuery {
    /// Build a query from raw parameters. A city wins over coordinates when both are given.
    pub fn from_params(
        city: Option<&str>,
        lat: Option<&str>,
        lon: Option<&str>,
    ) -> Result<Self, WeatherError> {
        if let Some(city) = present(city) {
            return Ok(Self::City(city.to_string()));
        }

        match (present(lat), present(lon)) {
            (Some(lat), Some(lon)) => parse_pair(lat, lon).map(Self::Coordinates),
            _ => Err(WeatherError::validation(MISSING_LOCATION)),
        }
    }

    /// Query-string pairs identifying this location to OpenWeather.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::City(name) => vec![("q", name.clone())],
            Self::Coordinates(c) => vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())],
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_pair(lat: &str, lon: &str) -> Result<Coordinates, WeatherError> {
    Ok(Coordinates {
        lat: parse_degrees(lat, "latitude")?,
        lon: parse_degrees(lon, "longitude")?,
    })
}

/// Only finite numbers are accepted; `nan`, `inf` and overflowing values are not.
fn parse_degrees(raw: &str, what: &str) -> Result<f64, WeatherError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| WeatherError::validation(format!("Invalid {what} '{raw}'.")))
}

/// One 3-hour sample from the forecast feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Unix timestamp (seconds, UTC).
    pub timestamp: i64,
    /// Provider calendar string, `YYYY-MM-DD HH:MM:SS`.
    pub date: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub condition: String,
}

impl ForecastEntry {
    /// UTC calendar day of this sample.
    ///
    /// Falls back to the date prefix of `date` when the timestamp is out of range.
    pub fn day_key(&self) -> Option<NaiveDate> {
        DateTime::from_timestamp(self.timestamp, 0)
            .map(|dt| dt.date_naive())
            .or_else(|| {
                let prefix = self.date.split(' ').next()?;
                NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
            })
    }
}

/// The first forecast entry seen for a calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub day: NaiveDate,
    #[serde(flatten)]
    pub entry: ForecastEntry,
}

/// Current conditions, as shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub condition: String,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub observation_time: DateTime<Utc>,
}

/// A severe-weather alert issued for a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAlert {
    #[serde(default)]
    pub sender_name: String,
    pub event: String,
    #[serde(default)]
    pub start: i64,
    #[serde(default)]
    pub end: i64,
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(timestamp: i64, date: &str) -> ForecastEntry {
        ForecastEntry {
            timestamp,
            date: date.into(),
            temperature_c: 10.0,
            feels_like_c: 9.0,
            humidity_pct: 70,
            wind_speed_mps: 3.0,
            condition: "light rain".into(),
        }
    }

    #[test]
    fn city_takes_precedence_over_coordinates() {
        let q = LocationQuery::from_params(Some("London"), Some("1"), Some("2")).unwrap();
        assert_eq!(q, LocationQuery::City("London".into()));
    }

    #[test]
    fn coordinates_are_used_without_city() {
        let q = LocationQuery::from_params(None, Some("51.5"), Some("-0.12")).unwrap();
        assert_eq!(q, LocationQuery::Coordinates(Coordinates::new(51.5, -0.12)));
        assert_eq!(
            q.query_pairs(),
            vec![("lat", "51.5".to_string()), ("lon", "-0.12".to_string())]
        );
    }

    #[test]
    fn missing_everything_is_validation_error() {
        let err = LocationQuery::from_params(None, None, None).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), MISSING_LOCATION);
    }

    #[test]
    fn blank_values_count_as_missing() {
        let err = LocationQuery::from_params(Some("  "), Some("1"), Some("")).unwrap_err();
        assert_eq!(err.to_string(), MISSING_LOCATION);
    }

    #[test]
    fn lone_latitude_is_rejected() {
        let err = LocationQuery::from_params(None, Some("1"), None).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn non_numeric_coordinates_are_rejected() {
        let err = LocationQuery::from_params(None, Some("north"), Some("2")).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("north"));
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        for (lat, lon) in [("nan", "1"), ("1", "inf"), ("-infinity", "2"), ("1e400", "2")] {
            let err = LocationQuery::from_params(None, Some(lat), Some(lon)).unwrap_err();
            assert!(err.is_validation(), "{lat},{lon}");
        }

        let err = Coordinates::from_params(Some("NaN"), Some("0")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid latitude 'NaN'.");
    }

    #[test]
    fn alert_coordinates_require_both_values() {
        let err = Coordinates::from_params(Some("1"), None).unwrap_err();
        assert_eq!(err.to_string(), MISSING_COORDINATES);

        let c = Coordinates::from_params(Some("1.5"), Some("2.5")).unwrap();
        assert_eq!(c, Coordinates::new(1.5, 2.5));
    }

    #[test]
    fn day_key_comes_from_timestamp() {
        // 2024-03-10 21:00:00 UTC
        let e = entry(1_710_104_400, "2024-03-10 21:00:00");
        assert_eq!(e.day_key(), NaiveDate::from_ymd_opt(2024, 3, 10));
    }

    #[test]
    fn day_key_falls_back_to_date_string() {
        let e = entry(i64::MAX, "2024-03-11 00:00:00");
        assert_eq!(e.day_key(), NaiveDate::from_ymd_opt(2024, 3, 11));

        let broken = entry(i64::MAX, "soon");
        assert_eq!(broken.day_key(), None);
    }
}
