//! Defines the `Observation` record, one forecast hour for one city, and the column
//! names used for it in the observation table and in the CSV store.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const COL_HOURS_FORECAST: &str = "hours_forecast";
pub const COL_DATETIME: &str = "datetime";
pub const COL_COUNTRY: &str = "country";
pub const COL_CITY: &str = "city";
pub const COL_TEMP: &str = "temp";
pub const COL_TEMP_FEELS_LIKE: &str = "temp_feels_like";
pub const COL_WEATHER: &str = "weather";
pub const COL_WEATHER_DESCRIPTION: &str = "weather_description";
pub const COL_POP: &str = "pop"; // Probability of precipitation
pub const COL_WIND_SPEED: &str = "wind_speed_m_s";
pub const COL_CLOUDS: &str = "clouds_percentage";
pub const COL_PRESSURE: &str = "pressure_level";
pub const COL_HUMIDITY: &str = "humidity_percentage";

/// Column order of the observation table and of the CSV file.
pub const OBSERVATION_COLUMNS: [&str; 13] = [
    COL_HOURS_FORECAST,
    COL_DATETIME,
    COL_COUNTRY,
    COL_CITY,
    COL_TEMP,
    COL_TEMP_FEELS_LIKE,
    COL_WEATHER,
    COL_WEATHER_DESCRIPTION,
    COL_POP,
    COL_WIND_SPEED,
    COL_CLOUDS,
    COL_PRESSURE,
    COL_HUMIDITY,
];

/// Format used for the `datetime` column when the table is written to CSV.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single forecast hour for one city.
///
/// `hours_forecast` is the 1-based position of this hour in the city's forecast
/// series. `datetime` is the forecast hour in UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub city: String,
    pub country: String,
    pub datetime: NaiveDateTime,
    pub hours_forecast: i64,
    /// Temperature in °C.
    pub temp: f64,
    pub temp_feels_like: f64,
    /// Weather category, e.g. "Rain" or "Clouds".
    pub weather: String,
    pub weather_description: String,
    /// Probability of precipitation in `[0, 1]`.
    pub pop: f64,
    pub wind_speed_m_s: f64,
    pub clouds_percentage: i64,
    pub pressure_level: i64,
    pub humidity_percentage: i64,
}
