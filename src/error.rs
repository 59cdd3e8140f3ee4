use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Data frame error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Schema mismatch: {message}")]
    SchemaMismatch { message: String },

    #[error("Station '{station}' not found in reference data")]
    UnknownStation { station: String },

    #[error("Date parsing error at row {row}: '{value}' is not a DD-Mon-YY date ({reason})")]
    DateParse {
        row: usize,
        value: String,
        reason: String,
    },

    #[error("Station reference file not found: {}", path.display())]
    MissingReferenceFile { path: PathBuf },

    #[error("Input directory not found: {}", path.display())]
    InputDirNotFound { path: PathBuf },

    #[error("Cannot create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid coordinate format: {0}")]
    InvalidCoordinate(String),

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl ProcessingError {
    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        ProcessingError::SchemaMismatch {
            message: message.into(),
        }
    }

    /// Errors that abort the whole run rather than a single input file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ProcessingError::InputDirNotFound { .. }
                | ProcessingError::OutputDir { .. }
                | ProcessingError::Config(_)
                | ProcessingError::ConfigSource(_)
                | ProcessingError::Pattern(_)
        )
    }
}
