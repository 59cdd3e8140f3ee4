use crate::error::Result;
use crate::processors::dataset_admission::{ColumnViolation, RejectionTally};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Pipeline stage of a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Read,
    Normalize,
    AdmissionCheck,
    Enrich,
    Fill,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Read => "read",
            Stage::Normalize => "normalize",
            Stage::AdmissionCheck => "admission check",
            Stage::Enrich => "enrich",
            Stage::Fill => "fill",
            Stage::Write => "write",
        };
        write!(f, "{}", name)
    }
}

/// A dataset discarded by the admission check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    pub file_name: String,
    pub violations: Vec<ColumnViolation>,
}

/// A file that could not be processed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileFailure {
    pub file_name: String,
    pub stage: Stage,
    pub message: String,
}

/// Aggregate outcome of one run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub total_files: usize,
    pub max_nan_percentage: f64,
    pub accepted: Vec<String>,
    pub rejected: Vec<Rejection>,
    pub rejection_counts: RejectionTally,
    pub failures: Vec<FileFailure>,
    pub validate_only: bool,
}

impl RunSummary {
    pub fn new(max_nan_percentage: f64, validate_only: bool) -> Self {
        Self {
            started_at: Utc::now(),
            total_files: 0,
            max_nan_percentage,
            accepted: Vec::new(),
            rejected: Vec::new(),
            rejection_counts: RejectionTally::default(),
            failures: Vec::new(),
            validate_only,
        }
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    /// Accepted output file names in sorted order
    pub fn sorted_accepted(&self) -> Vec<&str> {
        let mut accepted: Vec<&str> = self.accepted.iter().map(String::as_str).collect();
        accepted.sort_unstable();
        accepted
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Human-readable end-of-run report
    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Preprocessing Summary ===\n");
        summary.push_str(&format!(
            "Started: {}\n",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        if self.validate_only {
            summary.push_str("(validation only - no files written)\n");
        }
        summary.push_str(&format!(
            "Kept {} out of {} sets.\n",
            self.accepted_count(),
            self.total_files
        ));
        summary.push_str(&format!(
            "Rejected: {} (threshold {:.0}% missing)\n",
            self.rejected.len(),
            self.max_nan_percentage * 100.0
        ));
        summary.push_str(&format!("Failed: {}\n", self.failures.len()));

        if !self.accepted.is_empty() {
            summary.push_str("\nAccepted sets:\n");
            for name in self.sorted_accepted() {
                summary.push_str(&format!("  {}\n", name));
            }
        }

        if !self.rejection_counts.is_empty() {
            summary.push_str("\nColumns causing rejection:\n");
            for (column, count) in self.rejection_counts.ranked() {
                summary.push_str(&format!("  {:<16} {}\n", column, count));
            }
        }

        if !self.failures.is_empty() {
            summary.push_str("\nFailures:\n");
            for failure in &self.failures {
                summary.push_str(&format!(
                    "  {} ({}): {}\n",
                    failure.file_name, failure.stage, failure.message
                ));
            }
        }

        summary
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
