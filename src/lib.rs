mod config;
mod error;
mod forecast;
mod ingest;
mod observer;
mod query;
mod types;
mod utils;

#[cfg(test)]
mod test_support;

pub use error::ForecastError;
pub use forecast::WeatherForecast;

pub use config::{ConfigError, ForecastConfig, Location, API_KEY_ENV};
pub use config::{DEFAULT_GEOCODE_API, DEFAULT_WEATHER_API};
pub use observer::{ForecastEvent, ForecastObserver, LogObserver};

pub use query::aggregations::*;
pub use query::error::{HorizonError, QueryError};
pub use query::horizon::{resolve_horizon, validate_horizon};

pub use types::error::TableError;
pub use types::observation::*;
pub use types::observation_table::ObservationTable;

pub use ingest::csv_store::{read_observations, write_observations};
pub use ingest::error::IngestError;
pub use ingest::load_observations;
pub use ingest::openweather::{
    observations_from_forecast, GeoLocation, HourlyEntry, OneCallResponse, OpenWeatherClient,
    WeatherSummary,
};

pub use utils::get_cache_dir;
