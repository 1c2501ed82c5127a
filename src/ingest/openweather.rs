//! OpenWeather client: resolves configured cities with the geocoding API and fetches their
//! hourly forecast from the One Call API.

use crate::config::{ForecastConfig, Location};
use crate::ingest::error::IngestError;
use crate::types::observation::Observation;
use chrono::DateTime;
use log::{info, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

const UNKNOWN_WEATHER: &str = "Unknown";

/// One match from the geocoding API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoLocation {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherSummary {
    pub main: String,
    pub description: String,
}

/// One hour of a One Call forecast, in metric units.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HourlyEntry {
    pub dt: i64,
    pub temp: f64,
    pub feels_like: f64,
    pub pressure: i64,
    pub humidity: i64,
    pub clouds: i64,
    pub wind_speed: f64,
    #[serde(default)]
    pub pop: f64,
    #[serde(default)]
    pub weather: Vec<WeatherSummary>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OneCallResponse {
    #[serde(default)]
    pub hourly: Vec<HourlyEntry>,
}

pub struct OpenWeatherClient {
    http: Client,
    api_key: String,
    geocode_api: String,
    weather_api: String,
}

impl OpenWeatherClient {
    pub fn new(config: &ForecastConfig) -> Self {
        Self {
            http: Client::new(),
            api_key: config.api_key.clone(),
            geocode_api: config.geocode_api.clone(),
            weather_api: config.weather_api.clone(),
        }
    }

    /// Resolves a city to coordinates, taking the first geocoding match.
    pub async fn geocode(&self, location: &Location) -> Result<GeoLocation, IngestError> {
        let query = [
            ("q", format!("{},{}", location.city, location.country)),
            ("limit", "1".to_string()),
            ("appid", self.api_key.clone()),
        ];
        let matches: Vec<GeoLocation> = self.get_json(&self.geocode_api, &query).await?;
        matches
            .into_iter()
            .next()
            .ok_or_else(|| IngestError::LocationNotFound {
                city: location.city.clone(),
                country: location.country.clone(),
            })
    }

    /// Fetches the hourly forecast for a resolved location.
    pub async fn hourly_forecast(&self, geo: &GeoLocation) -> Result<OneCallResponse, IngestError> {
        let query = [
            ("lat", geo.lat.to_string()),
            ("lon", geo.lon.to_string()),
            ("exclude", "daily,minutely,current".to_string()),
            ("units", "metric".to_string()),
            ("appid", self.api_key.clone()),
        ];
        self.get_json(&self.weather_api, &query).await
    }

    /// Geocodes `location`, fetches its forecast and maps it to observations.
    pub async fn fetch_observations(
        &self,
        location: &Location,
    ) -> Result<Vec<Observation>, IngestError> {
        let geo = self.geocode(location).await?;
        info!(
            "Resolved {},{} to ({}, {})",
            location.city, location.country, geo.lat, geo.lon
        );
        let forecast = self.hourly_forecast(&geo).await?;
        observations_from_forecast(location, &forecast)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, IngestError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| IngestError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    IngestError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    IngestError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        let body = response
            .bytes()
            .await
            .map_err(|e| IngestError::NetworkRequest(url.to_string(), e))?;
        serde_json::from_slice(&body).map_err(|e| IngestError::JsonParse {
            url: url.to_string(),
            source: e,
        })
    }
}

/// Maps a One Call response to observations, numbering hours from 1 in response order.
pub fn observations_from_forecast(
    location: &Location,
    forecast: &OneCallResponse,
) -> Result<Vec<Observation>, IngestError> {
    if forecast.hourly.is_empty() {
        return Err(IngestError::EmptyForecast {
            city: location.city.clone(),
        });
    }

    forecast
        .hourly
        .iter()
        .zip(1_i64..)
        .map(|(entry, hours_forecast)| {
            let datetime = DateTime::from_timestamp(entry.dt, 0)
                .ok_or_else(|| IngestError::InvalidTimestamp {
                    city: location.city.clone(),
                    timestamp: entry.dt,
                })?
                .naive_utc();
            let (weather, weather_description) = match entry.weather.first() {
                Some(summary) => (summary.main.clone(), summary.description.clone()),
                None => (UNKNOWN_WEATHER.to_string(), UNKNOWN_WEATHER.to_string()),
            };
            Ok(Observation {
                city: location.city.clone(),
                country: location.country.clone(),
                datetime,
                hours_forecast,
                temp: entry.temp,
                temp_feels_like: entry.feels_like,
                weather,
                weather_description,
                pop: entry.pop,
                wind_speed_m_s: entry.wind_speed,
                clouds_percentage: entry.clouds,
                pressure_level: entry.pressure,
                humidity_percentage: entry.humidity,
            })
        })
        .collect()
}
