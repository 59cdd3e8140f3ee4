use crate::error::{ProcessingError, Result};
use crate::models::StationLocation;
use crate::utils::constants::{
    REFERENCE_LATITUDE_COLUMN, REFERENCE_LONGITUDE_COLUMN, REFERENCE_STATION_COLUMN,
};
use crate::utils::coordinates::parse_coordinate;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};
use validator::Validate;

/// Read-only lookup of station coordinates keyed by exact station name
#[derive(Debug, Clone, Default)]
pub struct StationDirectory {
    stations: HashMap<String, StationLocation>,
}

impl StationDirectory {
    /// Build from locations; the first entry for a repeated name wins
    pub fn from_locations(locations: Vec<StationLocation>) -> Self {
        let mut stations = HashMap::with_capacity(locations.len());
        for location in locations {
            if stations.contains_key(&location.name) {
                warn!("Duplicate reference entry for station '{}' ignored", location.name);
                continue;
            }
            stations.insert(location.name.clone(), location);
        }
        Self { stations }
    }

    pub fn get(&self, station: &str) -> Option<&StationLocation> {
        self.stations.get(station)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

pub struct StationReader;

impl StationReader {
    pub fn new() -> Self {
        Self
    }

    /// Read station coordinates from the reference CSV
    pub fn read_stations(&self, path: &Path) -> Result<Vec<StationLocation>> {
        if !path.is_file() {
            return Err(ProcessingError::MissingReferenceFile {
                path: path.to_path_buf(),
            });
        }

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let headers = reader.headers()?.clone();
        let name_idx = column_index(&headers, REFERENCE_STATION_COLUMN)?;
        let lat_idx = column_index(&headers, REFERENCE_LATITUDE_COLUMN)?;
        let lon_idx = column_index(&headers, REFERENCE_LONGITUDE_COLUMN)?;

        let mut stations = Vec::new();
        for record in reader.records() {
            let record = record?;
            if let Some(station) = self.parse_station_record(&record, name_idx, lat_idx, lon_idx)? {
                stations.push(station);
            }
        }

        debug!("Loaded {} stations from {}", stations.len(), path.display());
        Ok(stations)
    }

    fn parse_station_record(
        &self,
        record: &csv::StringRecord,
        name_idx: usize,
        lat_idx: usize,
        lon_idx: usize,
    ) -> Result<Option<StationLocation>> {
        let name = record.get(name_idx).unwrap_or_default().trim();
        if name.is_empty() {
            return Ok(None);
        }

        let latitude = parse_coordinate(record.get(lat_idx).unwrap_or_default()).map_err(|e| {
            ProcessingError::InvalidCoordinate(format!("Station '{}': {}", name, e))
        })?;
        let longitude = parse_coordinate(record.get(lon_idx).unwrap_or_default()).map_err(|e| {
            ProcessingError::InvalidCoordinate(format!("Station '{}': {}", name, e))
        })?;

        let station = StationLocation::new(name.to_string(), latitude, longitude);
        station.validate()?;
        Ok(Some(station))
    }

    pub fn read_directory(&self, path: &Path) -> Result<StationDirectory> {
        Ok(StationDirectory::from_locations(self.read_stations(path)?))
    }
}

impl Default for StationReader {
    fn default() -> Self {
        Self::new()
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers.iter().position(|h| h.trim() == name).ok_or_else(|| {
        ProcessingError::InvalidFormat(format!(
            "Reference file has no '{}' column",
            name
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn reference_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_read_stations_file() -> Result<()> {
        let file = reference_file(
            "Station Name,Latitude,Longitude\n\
\"Alipur, Delhi - DPCC\",28.8155,77.1530\n\
Anand Vihar,28.646667,77.315556\n\
,1.0,1.0\n",
        );

        let stations = StationReader::new().read_stations(file.path())?;

        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].name, "Alipur, Delhi - DPCC");
        assert!((stations[0].latitude - 28.8155).abs() < 1e-9);
        assert!((stations[1].latitude - 28.646667).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_degree_minute_second_rejected() {
        let file = reference_file("Station Name,Latitude,Longitude\nAnand Vihar,28:38:48,77:18:56\n");
        let result = StationReader::new().read_stations(file.path());
        assert!(matches!(result, Err(ProcessingError::InvalidCoordinate(_))));
    }

    #[test]
    fn test_directory_lookup() -> Result<()> {
        let file = reference_file("Latitude,Station Name,Longitude\n28.8,Alipur,77.1\n28.9,Alipur,77.2\n");
        let directory = StationReader::new().read_directory(file.path())?;

        assert_eq!(directory.len(), 1);
        let alipur = directory.get("Alipur").unwrap();
        assert_eq!(alipur.latitude, 28.8);
        assert!(directory.get("alipur").is_none());
        Ok(())
    }

    #[test]
    fn test_missing_reference_file() {
        let result = StationReader::new().read_stations(Path::new("does/not/exist.csv"));
        assert!(matches!(
            result,
            Err(ProcessingError::MissingReferenceFile { .. })
        ));
    }

    #[test]
    fn test_missing_column() {
        let file = reference_file("Station Name,Lat,Longitude\nAlipur,28.8,77.1\n");
        let result = StationReader::new().read_stations(file.path());
        assert!(matches!(result, Err(ProcessingError::InvalidFormat(_))));
    }

    #[test]
    fn test_out_of_range_coordinate() {
        let file = reference_file("Station Name,Latitude,Longitude\nAlipur,128.8,77.1\n");
        let result = StationReader::new().read_stations(file.path());
        assert!(matches!(result, Err(ProcessingError::Validation(_))));
    }
}
