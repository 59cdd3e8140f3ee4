use crate::config::PipelineConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aq-preprocessor")]
#[command(about = "Clean per-station air-quality datasets for model training")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Only print warnings and the final summary")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean every station file in the input directory and write accepted sets
    Process {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Run every check without writing any output files
    Validate {
        #[command(flatten)]
        run: RunArgs,
    },
}

/// Options shared by `process` and `validate`; each overrides the configuration file
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[arg(short, long, help = "Configuration file (TOML)")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Directory with raw station CSV files")]
    pub input_dir: Option<PathBuf>,

    #[arg(short, long, help = "Directory for cleaned station files")]
    pub output_dir: Option<PathBuf>,

    #[arg(short, long, help = "Station reference CSV with Latitude/Longitude")]
    pub reference_file: Option<PathBuf>,

    #[arg(long, help = "Maximum fraction of missing values per column [default: 0.20]")]
    pub max_nan_percentage: Option<f64>,

    #[arg(long, help = "Column never causing a rejection [default: RF(mm)]")]
    pub exempt_column: Option<String>,

    #[arg(long, help = "Only process file names matching this glob (e.g. 'AQ_*.csv')")]
    pub file_pattern: Option<String>,

    #[arg(long, help = "Memory-map input files")]
    pub mmap: bool,

    #[arg(long, help = "Write the run summary as JSON to this path")]
    pub report_json: Option<PathBuf>,
}

impl RunArgs {
    /// Apply command-line values on top of the loaded configuration
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(dir) = &self.input_dir {
            config.input_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(file) = &self.reference_file {
            config.reference_file = file.clone();
        }
        if let Some(threshold) = self.max_nan_percentage {
            config.max_nan_percentage = threshold;
        }
        if let Some(column) = &self.exempt_column {
            config.exempt_column = column.clone();
        }
        if let Some(pattern) = &self.file_pattern {
            config.file_pattern = Some(pattern.clone());
        }
        if self.mmap {
            config.use_mmap = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_process_command() {
        let cli = Cli::try_parse_from([
            "aq-preprocessor",
            "process",
            "--input-dir",
            "raw",
            "--max-nan-percentage",
            "0.3",
            "--verbose",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Commands::Process { run } = cli.command else {
            panic!("expected process command");
        };
        assert_eq!(run.input_dir, Some(PathBuf::from("raw")));
        assert_eq!(run.max_nan_percentage, Some(0.3));
    }

    #[test]
    fn test_apply_overrides() {
        let args = RunArgs {
            output_dir: Some(PathBuf::from("out")),
            exempt_column: Some("SR(W/mt2)".to_string()),
            mmap: true,
            ..RunArgs::default()
        };
        let mut config = PipelineConfig::default();

        args.apply(&mut config);

        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.exempt_column, "SR(W/mt2)");
        assert!(config.use_mmap);
        assert_eq!(config.max_nan_percentage, 0.20);
    }
}
