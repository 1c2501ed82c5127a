use crate::ingest::error::IngestError;
use crate::types::observation::DATETIME_FORMAT;
use crate::types::observation_table::ObservationTable;
use crate::utils::ensure_dir_exists;
use log::info;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::task;

/// Writes the table as a headed CSV, replacing `path` atomically.
///
/// The frame is written to a temporary file next to `path` and then renamed over it, so a
/// reader never sees a partially written file.
pub async fn write_observations(path: &Path, table: &ObservationTable) -> Result<(), IngestError> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    ensure_dir_exists(&parent)
        .await
        .map_err(|e| IngestError::DataDirCreation(parent.clone(), e))?;

    let path_buf = path.to_path_buf();
    let mut df = table.frame().clone();
    info!("Writing {} observations to {}", df.height(), path.display());

    task::spawn_blocking(move || {
        let mut temp_file = NamedTempFile::new_in(&parent)
            .map_err(|e| IngestError::CsvWriteIo(path_buf.clone(), e))?;
        CsvWriter::new(&mut temp_file)
            .include_header(true)
            .with_datetime_format(Some(DATETIME_FORMAT.to_string()))
            .finish(&mut df)
            .map_err(|e| IngestError::CsvWritePolars(path_buf.clone(), e))?;
        temp_file
            .persist(&path_buf)
            .map_err(|e| IngestError::CsvPersist(path_buf.clone(), e))?;
        Ok::<(), IngestError>(())
    })
    .await??;
    Ok(())
}

/// Reads a CSV written by [`write_observations`] (or any file with the same headers) and
/// validates it into a table.
pub async fn read_observations(path: &Path) -> Result<ObservationTable, IngestError> {
    let path_buf = path.to_path_buf();

    task::spawn_blocking(move || {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .map_parse_options(|options| options.with_try_parse_dates(true))
            .try_into_reader_with_file_path(Some(path_buf.clone()))
            .map_err(|e| IngestError::CsvRead(path_buf.clone(), e))?
            .finish()
            .map_err(|e| IngestError::CsvRead(path_buf.clone(), e))?;

        let table = ObservationTable::new(df)
            .map_err(|e| IngestError::InvalidCsvTable(path_buf.clone(), e))?;
        info!(
            "Loaded {} observations from {} (max horizon {}h)",
            table.height(),
            path_buf.display(),
            table.max_horizon()
        );
        Ok(table)
    })
    .await?
}
