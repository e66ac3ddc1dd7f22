use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use inquire::Password;
use std::sync::Arc;
use tracing::warn;
use weather_core::{
    CityIndex, Config, Coordinates, LocationParams, QueryForwarder, WeatherAlert,
    error::MISSING_LOCATION,
    provider::openweather::{parse_alerts, parse_current},
    provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "SmartWeather terminal client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Show current weather, a 5-day forecast and active alerts.
    Show {
        /// City name from the built-in city list.
        city: Option<String>,

        #[arg(long, requires = "lon", conflicts_with = "city", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },

    /// List known cities starting with a prefix.
    Cities {
        prefix: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, lat, lon } => show(city.as_deref(), lat, lon).await,
            Command::Cities { prefix } => {
                let index = Config::for_client()?.city_index()?;
                for city in index.suggest(&prefix) {
                    println!("{}", city.name);
                }
                Ok(())
            }
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Get one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    let path = config.save()?;

    println!("API key saved to {}", path.display());
    Ok(())
}

async fn show(city: Option<&str>, lat: Option<f64>, lon: Option<f64>) -> Result<()> {
    let config = Config::for_client()?;
    let params = resolve_location(&config.city_index()?, city, lat, lon)?;

    let forwarder = QueryForwarder::new(Arc::from(provider_from_config(&config)?));

    let (current, days) = tokio::try_join!(
        forwarder.weather(&params),
        forwarder.daily_forecast(&params)
    )
    .context("Could not fetch weather data.")?;
    let current = parse_current(&current)?;

    if let Some(alert) = first_alert(&forwarder, &params).await {
        println!("{}", render::alert_report(&alert));
    }

    println!("{}", render::current_report(&current));
    if !days.is_empty() {
        print!("{}", render::forecast_report(&days));
    }

    Ok(())
}

/// Turn a typed city or explicit coordinates into query parameters.
fn resolve_location(
    cities: &CityIndex,
    city: Option<&str>,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<LocationParams> {
    if let Some(name) = city {
        return match cities.find(name) {
            Some(found) => Ok(LocationParams::from(found.coordinates())),
            None => {
                let hints: Vec<&str> = cities
                    .suggest(name)
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect();
                if hints.is_empty() {
                    bail!("City not found.")
                }
                bail!("City not found. Did you mean: {}?", hints.join(", "))
            }
        };
    }

    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok(LocationParams::from(Coordinates::new(lat, lon))),
        _ => bail!(MISSING_LOCATION),
    }
}

/// Alerts are best-effort: a failure leaves the rest of the report intact.
async fn first_alert(forwarder: &QueryForwarder, params: &LocationParams) -> Option<WeatherAlert> {
    match forwarder.alerts(params).await.and_then(|body| parse_alerts(&body)) {
        Ok(alerts) => alerts.into_iter().next(),
        Err(err) => {
            warn!(%err, "Alert fetch error");
            None
        }
    }
}
