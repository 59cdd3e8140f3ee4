pub mod column_normalizer;
pub mod dataset_admission;
pub mod gap_filler;
pub mod geo_tagger;
pub mod pipeline;
pub mod run_summary;
pub mod season_tagger;

pub use column_normalizer::ColumnNormalizer;
pub use dataset_admission::{AdmissionDecision, ColumnViolation, DatasetAdmission, RejectionTally};
pub use gap_filler::{FillStats, GapFiller};
pub use geo_tagger::GeoTagger;
pub use pipeline::{FileOutcome, Pipeline};
pub use run_summary::{FileFailure, Rejection, RunSummary, Stage};
pub use season_tagger::{observation_season, SeasonTagger};
