pub mod measurement_reader;
pub mod station_reader;

pub use measurement_reader::{decode_bytes, MeasurementReader};
pub use station_reader::{StationDirectory, StationReader};
