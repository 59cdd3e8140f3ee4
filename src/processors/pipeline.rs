use crate::config::{HeaderRowRules, PipelineConfig};
use crate::error::{ProcessingError, Result};
use crate::models::MeasurementTable;
use crate::processors::{
    AdmissionDecision, ColumnNormalizer, ColumnViolation, DatasetAdmission, FileFailure,
    GapFiller, GeoTagger, Rejection, RejectionTally, RunSummary, SeasonTagger, Stage,
};
use crate::readers::{MeasurementReader, StationDirectory, StationReader};
use crate::utils::filename::{display_file_name, station_output_filename};
use crate::utils::progress::ProgressReporter;
use crate::writers::StationCsvWriter;
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span, warn};

/// Result of running one file through the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Accepted {
        station: String,
        output_name: String,
        output_path: Option<PathBuf>,
    },
    Rejected {
        violations: Vec<ColumnViolation>,
    },
}

/// Error tagged with the stage it occurred in
pub type StageResult<T> = std::result::Result<T, (Stage, ProcessingError)>;

trait AtStage<T> {
    fn at(self, stage: Stage) -> StageResult<T>;
}

impl<T> AtStage<T> for Result<T> {
    fn at(self, stage: Stage) -> StageResult<T> {
        self.map_err(|e| (stage, e))
    }
}

/// Sequential batch over an input directory:
/// read, normalize, admission check, then season and location features,
/// gap filling and write for admitted datasets.
pub struct Pipeline {
    input_dir: PathBuf,
    reference_file: PathBuf,
    use_mmap: bool,
    header_rules: HeaderRowRules,
    file_filter: Option<Pattern>,
    normalizer: ColumnNormalizer,
    admission: DatasetAdmission,
    season_tagger: SeasonTagger,
    filler: GapFiller,
    station_reader: StationReader,
    stations: Option<StationDirectory>,
    writer: StationCsvWriter,
    validate_only: bool,
}

impl Pipeline {
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        config.check()?;

        Ok(Self {
            input_dir: config.input_dir.clone(),
            reference_file: config.reference_file.clone(),
            use_mmap: config.use_mmap,
            header_rules: config.header_row_rules()?,
            file_filter: config.file_filter()?,
            normalizer: ColumnNormalizer::new(),
            admission: DatasetAdmission::new(config.max_nan_percentage, config.exempt_column.clone()),
            season_tagger: SeasonTagger::new(),
            filler: GapFiller::new(),
            station_reader: StationReader::new(),
            stations: None,
            writer: StationCsvWriter::new(config.output_dir.clone()),
            validate_only: false,
        })
    }

    /// Run every stage except writing output files
    pub fn with_validate_only(mut self, validate_only: bool) -> Self {
        self.validate_only = validate_only;
        self
    }

    /// Use an already loaded station table instead of reading the reference file
    pub fn with_stations(mut self, stations: StationDirectory) -> Self {
        self.stations = Some(stations);
        self
    }

    /// Regular files of the input directory, filtered and sorted by name
    pub fn discover_files(&self) -> Result<Vec<PathBuf>> {
        if !self.input_dir.is_dir() {
            return Err(ProcessingError::InputDirNotFound {
                path: self.input_dir.clone(),
            });
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.input_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(filter) = &self.file_filter {
                if !filter.matches(&display_file_name(&path)) {
                    continue;
                }
            }
            files.push(path);
        }

        files.sort();
        Ok(files)
    }

    /// Process every input file. Per-file errors are recorded in the summary;
    /// only missing input or an unusable output directory abort the run.
    pub fn run(&mut self, progress: Option<&ProgressReporter>) -> Result<RunSummary> {
        let files = self.discover_files()?;
        info!(
            "Found {} input files in {}",
            files.len(),
            self.input_dir.display()
        );

        if !self.validate_only {
            self.writer.ensure_output_dir()?;
        }

        let mut summary = RunSummary::new(self.admission.max_nan_percentage(), self.validate_only);

        for path in &files {
            let file_name = display_file_name(path);
            let _span = info_span!("file", name = %file_name).entered();
            summary.total_files += 1;

            if let Some(p) = progress {
                p.set_message(&format!("Processing {}", file_name));
            }

            match self.process_file(path, &mut summary.rejection_counts) {
                Ok(FileOutcome::Accepted {
                    station,
                    output_name,
                    output_path,
                }) => {
                    info!("Kept {} ({}) as {}", file_name, station, output_name);
                    if let Some(path) = output_path {
                        debug!("Output at {}", path.display());
                    }
                    summary.accepted.push(output_name);
                }
                Ok(FileOutcome::Rejected { violations }) => {
                    for violation in &violations {
                        warn!(
                            "Dropping {}: {} is {:.1}% missing, more than {:.1}%",
                            file_name,
                            violation.column,
                            violation.missing_ratio * 100.0,
                            self.admission.max_nan_percentage() * 100.0
                        );
                    }
                    summary.rejected.push(Rejection {
                        file_name,
                        violations,
                    });
                }
                Err((stage, error)) => {
                    if error.is_fatal() {
                        return Err(error);
                    }
                    warn!("Failed to process {} at {} stage: {}", file_name, stage, error);
                    summary.failures.push(FileFailure {
                        file_name,
                        stage,
                        message: error.to_string(),
                    });
                }
            }

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        if let Some(p) = progress {
            p.finish_with_message(&format!(
                "Kept {} of {} sets",
                summary.accepted_count(),
                summary.total_files
            ));
        }

        Ok(summary)
    }

    /// Run one file through every stage
    pub fn process_file(
        &mut self,
        path: &Path,
        tally: &mut RejectionTally,
    ) -> StageResult<FileOutcome> {
        let file_name = display_file_name(path);
        let header_row = self.header_rules.header_row_for(&file_name);

        let table = MeasurementReader::new()
            .with_header_row(header_row)
            .with_mmap(self.use_mmap)
            .read_table(path)
            .at(Stage::Read)?;
        let station = station_name(&table).at(Stage::Read)?;

        let mut table = self.normalizer.normalize(table).at(Stage::Normalize)?;

        if let AdmissionDecision::Rejected { violations } = self.admission.evaluate(&table, tally) {
            return Ok(FileOutcome::Rejected { violations });
        }

        self.season_tagger.tag(&mut table).at(Stage::Enrich)?;
        let directory = cached_directory(&mut self.stations, &self.station_reader, &self.reference_file)
            .at(Stage::Enrich)?;
        let table = GeoTagger::new(directory)
            .tag(table, &station)
            .at(Stage::Enrich)?;

        let (table, stats) = self.filler.fill(table).at(Stage::Fill)?;
        debug!(
            "Filled {} cells (forward {}, backward {}, constant {})",
            stats.total(),
            stats.forward,
            stats.backward,
            stats.constant
        );
        if table.missing_cells() != 0 {
            return Err((
                Stage::Fill,
                ProcessingError::MissingData("cells still missing after fill".to_string()),
            ));
        }

        let output_path = if self.validate_only {
            None
        } else {
            Some(self.writer.write_table(&table, &station).at(Stage::Write)?)
        };

        Ok(FileOutcome::Accepted {
            output_name: station_output_filename(&station),
            station,
            output_path,
        })
    }
}

/// Station name from the first cell of the first column
fn station_name(table: &MeasurementTable) -> Result<String> {
    if table.is_empty() {
        return Err(ProcessingError::MissingData("file has no data rows".to_string()));
    }

    let first = table
        .column_names()
        .first()
        .copied()
        .ok_or_else(|| ProcessingError::MissingData("file has no columns".to_string()))?;

    match table.text(0, first)?.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(ProcessingError::MissingData(
            "station name missing in first row".to_string(),
        )),
    }
}

/// Load the reference table on first use and keep it for the rest of the run
fn cached_directory<'a>(
    cache: &'a mut Option<StationDirectory>,
    reader: &StationReader,
    path: &Path,
) -> Result<&'a StationDirectory> {
    if cache.is_none() {
        let directory = reader.read_directory(path)?;
        info!("Loaded {} reference stations from {}", directory.len(), path.display());
        *cache = Some(directory);
    }

    cache
        .as_ref()
        .ok_or_else(|| ProcessingError::MissingData("station reference table not loaded".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StationLocation;
    use crate::test_support::{text_table, RAW_HEADERS};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        config: PipelineConfig,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let input_dir = dir.path().join("raw");
        fs::create_dir_all(&input_dir).unwrap();
        let reference_file = dir.path().join("stations.csv");
        fs::write(
            &reference_file,
            "Station Name,Latitude,Longitude\nAlipur,28.815329,77.15301\n",
        )
        .unwrap();

        let config = PipelineConfig {
            input_dir,
            output_dir: dir.path().join("final"),
            reference_file,
            ..PipelineConfig::default()
        };
        Fixture { _dir: dir, config }
    }

    /// Raw file contents with a title line, so the header is on row 1
    fn raw_csv(station: &str, dates: &[&str], pm10: &[&str]) -> String {
        let mut text = String::from("Central Control Room for Air Quality Management\n");
        text.push_str(&RAW_HEADERS.join(","));
        text.push('\n');
        for (date, pm) in dates.iter().zip(pm10) {
            let mut fields = vec![
                station.to_string(),
                date.to_string(),
                "00:00".to_string(),
                date.to_string(),
                "01:00".to_string(),
                pm.to_string(),
            ];
            fields.extend((6..RAW_HEADERS.len()).map(|i| i.to_string()));
            text.push_str(&fields.join(","));
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_station_name() {
        let table = text_table(&[("Station Name", &[Some("Alipur"), Some("Alipur")])]);
        assert_eq!(station_name(&table).unwrap(), "Alipur");

        let empty = text_table(&[("Station Name", &[])]);
        assert!(matches!(station_name(&empty), Err(ProcessingError::MissingData(_))));

        let blank = text_table(&[("Station Name", &[None])]);
        assert!(matches!(station_name(&blank), Err(ProcessingError::MissingData(_))));
    }

    #[test]
    fn test_discover_files_sorted_and_filtered() {
        let mut fx = fixture();
        for name in ["b.csv", "a.csv", "notes.txt"] {
            fs::write(fx.config.input_dir.join(name), "").unwrap();
        }
        fs::create_dir_all(fx.config.input_dir.join("nested")).unwrap();

        let pipeline = Pipeline::new(&fx.config).unwrap();
        let names: Vec<String> = pipeline
            .discover_files()
            .unwrap()
            .iter()
            .map(|p| display_file_name(p))
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv", "notes.txt"]);

        fx.config.file_pattern = Some("*.csv".to_string());
        let pipeline = Pipeline::new(&fx.config).unwrap();
        assert_eq!(pipeline.discover_files().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_input_dir_is_fatal() {
        let mut fx = fixture();
        fx.config.input_dir = fx.config.input_dir.join("missing");

        let mut pipeline = Pipeline::new(&fx.config).unwrap();
        assert!(matches!(
            pipeline.run(None),
            Err(ProcessingError::InputDirNotFound { .. })
        ));
    }

    #[test]
    fn test_accepted_file_written() {
        let fx = fixture();
        fs::write(
            fx.config.input_dir.join("AQ_Alipur.csv"),
            raw_csv(
                "Alipur",
                &["01-Jan-21", "02-Jan-21", "03-Jan-21", "04-Jan-21", "05-Jan-21"],
                &["", "40", "41", "42", "43"],
            ),
        )
        .unwrap();

        let mut pipeline = Pipeline::new(&fx.config).unwrap();
        let summary = pipeline.run(None).unwrap();

        assert_eq!(summary.accepted, vec!["Alipur.csv".to_string()]);
        let written = MeasurementReader::new()
            .with_header_row(0)
            .read_table(&fx.config.output_dir.join("Alipur.csv"))
            .unwrap();
        assert_eq!(written.column_count(), 23);
        assert_eq!(written.missing_cells(), 0);
        assert_eq!(written.value(0, "PM10(ug/m3)").unwrap(), Some(40.0));
        assert_eq!(written.text(2, "Winter").unwrap(), Some("1"));
        assert_eq!(written.value(1, "Latitude").unwrap(), Some(28.815329));
    }

    #[test]
    fn test_unknown_station_is_per_file_failure() {
        let fx = fixture();
        fs::write(
            fx.config.input_dir.join("AQ_Bawana.csv"),
            raw_csv("Bawana", &["01-Jan-21"], &["40"]),
        )
        .unwrap();
        fs::write(
            fx.config.input_dir.join("AQ_Alipur.csv"),
            raw_csv("Alipur", &["01-Jan-21"], &["40"]),
        )
        .unwrap();

        let mut pipeline = Pipeline::new(&fx.config).unwrap();
        let summary = pipeline.run(None).unwrap();

        assert_eq!(summary.total_files, 2);
        assert_eq!(summary.accepted, vec!["Alipur.csv".to_string()]);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].file_name, "AQ_Bawana.csv");
        assert_eq!(summary.failures[0].stage, Stage::Enrich);
    }

    #[test]
    fn test_validate_only_writes_nothing() {
        let fx = fixture();
        fs::write(
            fx.config.input_dir.join("AQ_Alipur.csv"),
            raw_csv("Alipur", &["01-Jan-21"], &["40"]),
        )
        .unwrap();

        let mut pipeline = Pipeline::new(&fx.config)
            .unwrap()
            .with_validate_only(true)
            .with_stations(StationDirectory::from_locations(vec![StationLocation::new(
                "Alipur".to_string(),
                28.8,
                77.1,
            )]));
        let summary = pipeline.run(None).unwrap();

        assert_eq!(summary.accepted_count(), 1);
        assert!(summary.validate_only);
        assert!(!fx.config.output_dir.exists());
    }

    #[test]
    fn test_header_row_override() {
        let mut fx = fixture();
        let contents = raw_csv("Alipur", &["01-Jan-21"], &["40"]);
        let without_title = contents.split_once('\n').unwrap().1;
        fs::write(fx.config.input_dir.join("AQ_Alipur_N.csv"), without_title).unwrap();

        let mut pipeline = Pipeline::new(&fx.config).unwrap();
        let summary = pipeline.run(None).unwrap();
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].stage, Stage::Read);

        fx.config.header_rows.push(crate::config::HeaderRowOverride {
            pattern: "*_N.csv".to_string(),
            header_row: 0,
        });
        let mut pipeline = Pipeline::new(&fx.config).unwrap();
        let summary = pipeline.run(None).unwrap();
        assert_eq!(summary.accepted_count(), 1);
    }
}
