use crate::error::{ProcessingError, Result};
use crate::models::{MeasurementTable, StationLocation};
use crate::readers::StationDirectory;
use crate::utils::constants::{LATITUDE_COLUMN, LONGITUDE_COLUMN};
use polars::prelude::*;

/// Appends the station's reference coordinates as two constant columns
pub struct GeoTagger<'a> {
    directory: &'a StationDirectory,
}

impl<'a> GeoTagger<'a> {
    pub fn new(directory: &'a StationDirectory) -> Self {
        Self { directory }
    }

    pub fn locate(&self, station: &str) -> Result<&'a StationLocation> {
        self.directory
            .get(station)
            .ok_or_else(|| ProcessingError::UnknownStation {
                station: station.to_string(),
            })
    }

    /// An unknown station fails before the table is consumed
    pub fn tag(&self, table: MeasurementTable, station: &str) -> Result<MeasurementTable> {
        let location = self.locate(station)?;

        let frame = table
            .into_frame()
            .lazy()
            .with_columns([
                lit(location.latitude).alias(LATITUDE_COLUMN),
                lit(location.longitude).alias(LONGITUDE_COLUMN),
            ])
            .collect()?;

        Ok(MeasurementTable::new(frame))
    }
}
