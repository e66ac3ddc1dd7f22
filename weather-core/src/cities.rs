use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::model::Coordinates;

/// Inputs shorter than this produce no suggestions.
pub const MIN_PREFIX_LEN: usize = 2;

/// Upper bound on suggestions returned for one input.
pub const MAX_SUGGESTIONS: usize = 10;

const BUNDLED_CITIES: &str = include_str!("../data/cities.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl City {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

/// Static list of known cities, used for autocomplete and name lookup.
#[derive(Debug, Clone, Default)]
pub struct CityIndex {
    cities: Vec<City>,
}

impl CityIndex {
    pub fn new(cities: Vec<City>) -> Self {
        Self { cities }
    }

    /// Parse a JSON array of `{ "name", "lat", "lon" }` objects.
    pub fn from_json(json: &str) -> Result<Self> {
        let cities: Vec<City> =
            serde_json::from_str(json).context("Failed to parse city list JSON")?;
        Ok(Self::new(cities))
    }

    /// Load a city list from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read city list: {}", path.display()))?;

        Self::from_json(&contents)
            .with_context(|| format!("Invalid city list: {}", path.display()))
    }

    /// The list shipped with this crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_CITIES)
    }

    /// Cities whose name starts with `input`, ignoring case, in list order.
    pub fn suggest(&self, input: &str) -> Vec<&City> {
        if input.chars().count() < MIN_PREFIX_LEN {
            return Vec::new();
        }

        let prefix = input.to_lowercase();
        self.cities
            .iter()
            .filter(|c| c.name.to_lowercase().starts_with(&prefix))
            .take(MAX_SUGGESTIONS)
            .collect()
    }

    /// Exact, case-insensitive lookup by name.
    pub fn find(&self, name: &str) -> Option<&City> {
        let wanted = name.trim().to_lowercase();
        self.cities.iter().find(|c| c.name.to_lowercase() == wanted)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}
