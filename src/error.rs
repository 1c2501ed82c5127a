use crate::config::ConfigError;
use crate::ingest::error::IngestError;
use crate::query::error::{HorizonError, QueryError};
use crate::types::error::TableError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Horizon(#[from] HorizonError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
