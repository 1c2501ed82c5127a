pub mod csv_store;
pub mod error;
pub mod openweather;

use crate::ingest::error::IngestError;
use crate::types::observation_table::ObservationTable;
use std::path::Path;

/// Loads an observation CSV into a validated table.
pub async fn load_observations(path: impl AsRef<Path>) -> Result<ObservationTable, IngestError> {
    csv_store::read_observations(path.as_ref()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_table;

    #[tokio::test]
    async fn test_load_observations_reads_written_table() -> Result<(), Box<dyn std::error::Error>>
    {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("weather.csv");
        csv_store::write_observations(&path, &sample_table()).await?;

        let table = load_observations(&path).await?;
        assert_eq!(table.to_observations()?, sample_table().to_observations()?);
        Ok(())
    }
}
