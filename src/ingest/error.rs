use crate::types::error::TableError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse JSON response from {url}")]
    JsonParse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No geocoding match for '{city},{country}'")]
    LocationNotFound { city: String, country: String },

    #[error("Forecast for '{city}' contains no hourly entries")]
    EmptyForecast { city: String },

    #[error("Invalid forecast timestamp {timestamp} for '{city}'")]
    InvalidTimestamp { city: String, timestamp: i64 },

    #[error("Failed to create data directory '{0}'")]
    DataDirCreation(PathBuf, #[source] std::io::Error),

    // Errors during CSV writing (inside blocking task)
    #[error("I/O error writing CSV file '{0}'")]
    CsvWriteIo(PathBuf, #[source] std::io::Error),
    #[error("Encoding error writing CSV file '{0}'")]
    CsvWritePolars(PathBuf, #[source] PolarsError),
    #[error("Failed to move CSV file into place at '{0}'")]
    CsvPersist(PathBuf, #[source] tempfile::PersistError),

    #[error("Parsing error reading CSV file '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    #[error("Observations in '{0}' do not form a valid table")]
    InvalidCsvTable(PathBuf, #[source] TableError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
