use crate::utils::constants::OUTPUT_EXTENSION;
use std::path::Path;

/// Output file name for a station: `<station_name>.csv`.
///
/// Path separators inside the station name are replaced with `_` so the file
/// always lands directly inside the output directory.
pub fn station_output_filename(station_name: &str) -> String {
    let safe: String = station_name
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{}.{}", safe, OUTPUT_EXTENSION)
}

/// File name component of a path as an owned string, for logging and reports
pub fn display_file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
