/// Canonical column names referenced by the pipeline stages
pub const DATE_COLUMN: &str = "From";
pub const RAINFALL_COLUMN: &str = "RF(mm)";
pub const LATITUDE_COLUMN: &str = "Latitude";
pub const LONGITUDE_COLUMN: &str = "Longitude";

/// Reference file columns
pub const REFERENCE_STATION_COLUMN: &str = "Station Name";
pub const REFERENCE_LATITUDE_COLUMN: &str = "Latitude";
pub const REFERENCE_LONGITUDE_COLUMN: &str = "Longitude";

/// Default paths
pub const DEFAULT_INPUT_DIR: &str = "data/raw_data";
pub const DEFAULT_OUTPUT_DIR: &str = "data/final_data";
pub const DEFAULT_REFERENCE_FILE: &str =
    "data/pre_processing/additional_features/latitude_longitude_data.csv";

/// Admission defaults
pub const DEFAULT_MAX_NAN_PERCENTAGE: f64 = 0.20;

/// Header handling
pub const DEFAULT_HEADER_ROW: usize = 1;
pub const ALIPUR_SOURCE_FILE: &str = "AQ_Alipur_Aug21_July22_N.csv";
pub const ALIPUR_HEADER_ROW: usize = 0;

/// Value written into cells that are still empty after forward and backward fill
pub const CONSTANT_FILL_VALUE: f64 = 0.0;

/// One-hot markers
pub const ONE_HOT_SET: i32 = 1;
pub const ONE_HOT_UNSET: i32 = 0;

/// Cell contents treated as missing (after trimming)
pub const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>",
    "#N/A", "#N/A N/A", "#NA", "1.#IND", "-1.#IND", "1.#QNAN", "-1.#QNAN",
];

/// I/O
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
pub const OUTPUT_EXTENSION: &str = "csv";
pub const ENV_PREFIX: &str = "AQ_PREPROCESSOR";
