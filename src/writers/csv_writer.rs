use crate::error::{ProcessingError, Result};
use crate::models::MeasurementTable;
use crate::utils::filename::station_output_filename;
use polars::prelude::*;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tracing::debug;

/// Writes cleaned station tables as `<station>.csv` into one output directory
pub struct StationCsvWriter {
    output_dir: PathBuf,
}

impl StationCsvWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Create the output directory if it does not exist
    pub fn ensure_output_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| ProcessingError::OutputDir {
            path: self.output_dir.clone(),
            source,
        })
    }

    pub fn output_path(&self, station_name: &str) -> PathBuf {
        self.output_dir.join(station_output_filename(station_name))
    }

    /// Write the table atomically: a temporary file in the output directory is
    /// renamed over the destination only after a complete write.
    pub fn write_table(&self, table: &MeasurementTable, station_name: &str) -> Result<PathBuf> {
        self.ensure_output_dir()?;
        let path = self.output_path(station_name);

        let mut frame = table.frame().clone();
        let mut temp_file = NamedTempFile::new_in(&self.output_dir)?;
        CsvWriter::new(temp_file.as_file_mut())
            .include_header(true)
            .finish(&mut frame)?;
        temp_file.persist(&path).map_err(|e| ProcessingError::Io(e.error))?;

        debug!("Wrote {} rows to {}", table.row_count(), path.display());
        Ok(path)
    }
}
