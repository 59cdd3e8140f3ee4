//! Run configuration.
//!
//! Values are layered: built-in defaults, then an optional configuration file
//! (format taken from its extension, usually TOML), then `AQ_PREPROCESSOR_*`
//! environment variables. Command-line flags are applied on top by the CLI.

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    ALIPUR_HEADER_ROW, ALIPUR_SOURCE_FILE, DEFAULT_HEADER_ROW, DEFAULT_INPUT_DIR,
    DEFAULT_MAX_NAN_PERCENTAGE, DEFAULT_OUTPUT_DIR, DEFAULT_REFERENCE_FILE, ENV_PREFIX,
    RAINFALL_COLUMN,
};
use config::{Config, Environment, File};
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

/// Header row index for input files whose name matches `pattern`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRowOverride {
    /// Glob matched against the file name only
    pub pattern: String,
    pub header_row: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding one raw CSV per station
    pub input_dir: PathBuf,

    /// Destination of cleaned files, created when absent
    pub output_dir: PathBuf,

    /// CSV with `Station Name`, `Latitude`, `Longitude`
    pub reference_file: PathBuf,

    /// Highest tolerated fraction of missing cells in any non-exempt column
    #[validate(range(min = 0.0, max = 1.0))]
    pub max_nan_percentage: f64,

    /// Column that never causes a rejection
    #[validate(length(min = 1))]
    pub exempt_column: String,

    pub default_header_row: usize,

    /// Per-file header row exceptions; first match wins
    pub header_rows: Vec<HeaderRowOverride>,

    /// Optional glob restricting which input file names are processed
    pub file_pattern: Option<String>,

    pub use_mmap: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            reference_file: PathBuf::from(DEFAULT_REFERENCE_FILE),
            max_nan_percentage: DEFAULT_MAX_NAN_PERCENTAGE,
            exempt_column: RAINFALL_COLUMN.to_string(),
            default_header_row: DEFAULT_HEADER_ROW,
            header_rows: vec![HeaderRowOverride {
                pattern: ALIPUR_SOURCE_FILE.to_string(),
                header_row: ALIPUR_HEADER_ROW,
            }],
            file_pattern: None,
            use_mmap: false,
        }
    }
}

impl PipelineConfig {
    /// Load defaults, an optional configuration file and the environment
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = config_file {
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let config: PipelineConfig = builder.build()?.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    /// Validate field ranges and compile every pattern once
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        self.header_row_rules()?;
        self.file_filter()?;
        Ok(())
    }

    pub fn header_row_rules(&self) -> Result<HeaderRowRules> {
        HeaderRowRules::new(self.default_header_row, &self.header_rows)
    }

    pub fn file_filter(&self) -> Result<Option<Pattern>> {
        self.file_pattern
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    ProcessingError::Config(format!("Invalid file_pattern '{}': {}", p, e))
                })
            })
            .transpose()
    }
}

/// Compiled header-row overrides
#[derive(Debug, Clone)]
pub struct HeaderRowRules {
    default_row: usize,
    rules: Vec<(Pattern, usize)>,
}

impl HeaderRowRules {
    pub fn new(default_row: usize, overrides: &[HeaderRowOverride]) -> Result<Self> {
        let rules = overrides
            .iter()
            .map(|o| Ok((Pattern::new(&o.pattern)?, o.header_row)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { default_row, rules })
    }

    pub fn header_row_for(&self, file_name: &str) -> usize {
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.matches(file_name))
            .map(|(_, row)| *row)
            .unwrap_or(self.default_row)
    }
}
