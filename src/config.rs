//! Loads the TOML configuration naming the OpenWeather endpoints, the API key and the
//! cities to ingest.
//!
//! ```toml
//! api_key = "..."
//! weather_data_csv = "data/weather.csv"   # optional
//!
//! [[locations]]
//! city = "Milan"
//! country = "IT"
//!
//! [[locations]]
//! city = "Cagliari"
//! country = "IT"
//! ```

use crate::utils::get_cache_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_GEOCODE_API: &str = "http://api.openweathermap.org/geo/1.0/direct";
pub const DEFAULT_WEATHER_API: &str = "https://api.openweathermap.org/data/3.0/onecall";
const DEFAULT_CSV_FILE_NAME: &str = "weather.csv";

/// Environment variable that overrides `api_key` from the file.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse config")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to determine data directory")]
    DataDirResolution(#[source] std::io::Error),
}

/// A city to fetch forecasts for. `country` is an ISO 3166 code, e.g. "IT".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub country: String,
}

impl Location {
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_geocode_api")]
    pub geocode_api: String,
    #[serde(default = "default_weather_api")]
    pub weather_api: String,
    /// Where ingested observations are written. Resolved against the cache directory if absent.
    #[serde(default)]
    pub weather_data_csv: Option<PathBuf>,
    #[serde(default)]
    pub locations: Vec<Location>,
}

fn default_geocode_api() -> String {
    DEFAULT_GEOCODE_API.to_string()
}

fn default_weather_api() -> String {
    DEFAULT_WEATHER_API.to_string()
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            geocode_api: default_geocode_api(),
            weather_api: default_weather_api(),
            weather_data_csv: None,
            locations: Vec::new(),
        }
    }
}

impl ForecastConfig {
    /// Reads a config file, then applies the [`API_KEY_ENV`] override.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let mut config = Self::from_toml_str(&contents)?;
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                config.api_key = key;
            }
        }
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// The configured CSV path, or `weather.csv` in the cache directory.
    pub fn weather_data_csv(&self) -> Result<PathBuf, ConfigError> {
        match &self.weather_data_csv {
            Some(path) => Ok(path.clone()),
            None => get_cache_dir()
                .map(|dir| dir.join(DEFAULT_CSV_FILE_NAME))
                .map_err(ConfigError::DataDirResolution),
        }
    }
}
