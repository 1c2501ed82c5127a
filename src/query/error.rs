use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HorizonError {
    #[error(
        "Invalid hours forecast {requested}, please specify hours in range [1, {max_horizon}]"
    )]
    OutOfRange { requested: u32, max_horizon: u32 },
}

/// Failure of one of the aggregation queries. No partial result accompanies it.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    OutOfRange(#[from] HorizonError),

    #[error("No observation table loaded; ingest or load forecast data first")]
    NotIngested,

    #[error("Query '{operation}' failed: {source}")]
    Execution {
        operation: &'static str,
        #[source]
        source: PolarsError,
    },
}
