use crate::models::MeasurementTable;
use crate::utils::constants::{DEFAULT_MAX_NAN_PERCENTAGE, RAINFALL_COLUMN};
use serde::Serialize;
use std::collections::BTreeMap;

/// A column whose missing ratio exceeded the admission threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnViolation {
    pub column: String,
    pub missing_ratio: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdmissionDecision {
    Accepted,
    Rejected { violations: Vec<ColumnViolation> },
}

impl AdmissionDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, AdmissionDecision::Accepted)
    }
}

/// Per-column count of datasets rejected because of that column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RejectionTally {
    counts: BTreeMap<String, usize>,
}

impl RejectionTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, column: &str) {
        *self.counts.entry(column.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, column: &str) -> usize {
        self.counts.get(column).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Columns by descending count, ties by name
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> =
            self.counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

/// Decides whether a dataset has few enough missing values to be kept
pub struct DatasetAdmission {
    max_nan_percentage: f64,
    exempt_column: String,
}

impl DatasetAdmission {
    pub fn new(max_nan_percentage: f64, exempt_column: impl Into<String>) -> Self {
        Self {
            max_nan_percentage,
            exempt_column: exempt_column.into(),
        }
    }

    pub fn max_nan_percentage(&self) -> f64 {
        self.max_nan_percentage
    }

    /// Evaluate every column; each violating column is counted once in `tally`
    pub fn evaluate(&self, table: &MeasurementTable, tally: &mut RejectionTally) -> AdmissionDecision {
        let violations: Vec<ColumnViolation> = table
            .missing_ratios()
            .into_iter()
            .filter(|(column, _)| *column != self.exempt_column)
            .filter(|(_, missing_ratio)| *missing_ratio > self.max_nan_percentage)
            .map(|(column, missing_ratio)| ColumnViolation {
                column: column.to_string(),
                missing_ratio,
            })
            .collect();

        if violations.is_empty() {
            return AdmissionDecision::Accepted;
        }

        for violation in &violations {
            tally.increment(&violation.column);
        }
        AdmissionDecision::Rejected { violations }
    }
}

impl Default for DatasetAdmission {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NAN_PERCENTAGE, RAINFALL_COLUMN)
    }
}
