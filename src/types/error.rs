use polars::error::PolarsError;
use thiserror::Error;

/// Raised when a frame cannot become an [`crate::ObservationTable`].
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Observation table has no rows")]
    Empty,

    #[error("Required column '{0}' not found in observation frame")]
    MissingColumn(String, #[source] PolarsError),

    #[error("Column '{0}' contains null values")]
    NullValues(String),

    #[error(
        "Forecast hours for city '{city}' are not a dense 1..{rows} sequence (found {first_hour}..{last_hour} with {distinct_hours} distinct hours)"
    )]
    NonDenseHorizon {
        city: String,
        rows: i64,
        first_hour: i64,
        last_hour: i64,
        distinct_hours: i64,
    },

    #[error("City '{city}' has {rows} forecast hours but the table horizon is {max_horizon}")]
    UnevenHorizon {
        city: String,
        rows: i64,
        max_horizon: i64,
    },

    #[error("Failed processing observation frame: {0}")]
    Polars(#[from] PolarsError),
}
