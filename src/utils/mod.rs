pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use coordinates::parse_coordinate;
pub use filename::{display_file_name, station_output_filename};
pub use progress::ProgressReporter;
