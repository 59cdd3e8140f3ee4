//! Declared column layouts of station measurement files.
//!
//! Raw monitoring exports carry 25 columns in a fixed order. The cleaned
//! output uses a 17-column canonical schema that downstream consumers depend
//! on, so both the names and the order below are part of the contract.

use crate::error::{ProcessingError, Result};
use std::fmt;

/// Why a raw column is left out of the canonical schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Carries the same signal as a retained column
    Correlated,
    /// Mostly empty across stations
    Sparse,
}

impl DropReason {
    pub fn description(&self) -> &'static str {
        match self {
            DropReason::Correlated => "correlated with a retained feature",
            DropReason::Sparse => "chronically sparse",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Retained and renamed to the given canonical name
    Keep(&'static str),
    Drop(DropReason),
}

/// One position of the raw layout: accepted header stems plus what happens to it
#[derive(Debug, Clone, Copy)]
pub struct InputColumn {
    pub label: &'static str,
    pub stems: &'static [&'static str],
    pub role: ColumnRole,
}

impl InputColumn {
    const fn keep(label: &'static str, stems: &'static [&'static str], name: &'static str) -> Self {
        Self {
            label,
            stems,
            role: ColumnRole::Keep(name),
        }
    }

    const fn drop(label: &'static str, stems: &'static [&'static str], reason: DropReason) -> Self {
        Self {
            label,
            stems,
            role: ColumnRole::Drop(reason),
        }
    }

    pub fn matches(&self, header: &str) -> bool {
        let stem = header_stem(header);
        self.stems.iter().any(|s| *s == stem)
    }
}

pub const RAW_COLUMN_COUNT: usize = 25;
pub const CANONICAL_COLUMN_COUNT: usize = 17;

pub const RAW_LAYOUT: [InputColumn; RAW_COLUMN_COUNT] = [
    InputColumn::keep("Station Name", &["stationname", "station"], "Station Name"),
    InputColumn::keep("From", &["from", "fromdate"], "From"),
    InputColumn::keep("FT", &["ft", "fromtime"], "FT"),
    InputColumn::keep("To", &["to", "todate"], "To"),
    InputColumn::keep("TT", &["tt", "totime"], "TT"),
    InputColumn::keep("PM10", &["pm10"], "PM10(ug/m3)"),
    InputColumn::keep("PM2.5", &["pm25"], "PM2.5(ug/m3)"),
    InputColumn::keep("AT", &["at"], "AT()"),
    InputColumn::keep("BP", &["bp"], "BP(mmHg)"),
    InputColumn::keep("SR", &["sr"], "SR(W/mt2)"),
    InputColumn::keep("RH", &["rh"], "RH(%)"),
    InputColumn::keep("WD", &["wd"], "WD(degree)"),
    InputColumn::keep("RF", &["rf"], "RF(mm)"),
    InputColumn::drop("NO", &["no"], DropReason::Correlated),
    InputColumn::keep("NOx", &["nox"], "NOx(ppb)"),
    InputColumn::keep("NO2", &["no2"], "NO2(ug/m3)"),
    InputColumn::drop("NH3", &["nh3"], DropReason::Sparse),
    InputColumn::drop("SO2", &["so2"], DropReason::Sparse),
    InputColumn::keep("CO", &["co"], "CO(mg/m3)"),
    InputColumn::keep("Ozone", &["ozone", "o3"], "Ozone(ug/m3)"),
    InputColumn::drop("Benzene", &["benzene"], DropReason::Sparse),
    InputColumn::drop("Toluene", &["toluene"], DropReason::Sparse),
    InputColumn::drop("Xylene", &["xylene", "oxylene"], DropReason::Sparse),
    InputColumn::drop("MP-Xylene", &["mpxylene"], DropReason::Sparse),
    InputColumn::drop("Eth-Xylene", &["ethxylene", "ethylbenzene"], DropReason::Sparse),
];

pub const CANONICAL_COLUMNS: [&str; CANONICAL_COLUMN_COUNT] = [
    "Station Name",
    "From",
    "FT",
    "To",
    "TT",
    "PM10(ug/m3)",
    "PM2.5(ug/m3)",
    "AT()",
    "BP(mmHg)",
    "SR(W/mt2)",
    "RH(%)",
    "WD(degree)",
    "RF(mm)",
    "NOx(ppb)",
    "NO2(ug/m3)",
    "CO(mg/m3)",
    "Ozone(ug/m3)",
];

/// Canonical columns kept as text; every other canonical column holds a reading
pub const TEXT_COLUMNS: [&str; 5] = ["Station Name", "From", "FT", "To", "TT"];

pub fn is_reading_column(name: &str) -> bool {
    !TEXT_COLUMNS.contains(&name)
}

/// Comparable form of a header: text before the unit suffix, lower-cased,
/// alphanumerics only. `"PM2.5(ug/m3)"` becomes `"pm25"`.
pub fn header_stem(header: &str) -> String {
    let base = header.split('(').next().unwrap_or_default();
    base.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Layout a measurement file arrives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLayout {
    /// Monitoring export with all 25 columns
    Raw,
    /// Already reduced to the 17 canonical columns
    Canonical,
}

impl SourceLayout {
    /// Determine the layout of a header row, failing on anything that matches neither
    pub fn detect(headers: &[&str]) -> Result<Self> {
        match headers.len() {
            RAW_COLUMN_COUNT => {
                for (idx, (header, expected)) in headers.iter().zip(RAW_LAYOUT.iter()).enumerate()
                {
                    if !expected.matches(header) {
                        return Err(ProcessingError::schema_mismatch(format!(
                            "column {} should be '{}', found '{}'",
                            idx, expected.label, header
                        )));
                    }
                }
                Ok(SourceLayout::Raw)
            }
            CANONICAL_COLUMN_COUNT => {
                for (idx, (header, expected)) in
                    headers.iter().zip(CANONICAL_COLUMNS.iter()).enumerate()
                {
                    if header_stem(header) != header_stem(expected) {
                        return Err(ProcessingError::schema_mismatch(format!(
                            "column {} should be '{}', found '{}'",
                            idx, expected, header
                        )));
                    }
                }
                Ok(SourceLayout::Canonical)
            }
            n => Err(ProcessingError::schema_mismatch(format!(
                "expected {} raw or {} canonical columns, found {}",
                RAW_COLUMN_COUNT, CANONICAL_COLUMN_COUNT, n
            ))),
        }
    }
}

impl fmt::Display for SourceLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLayout::Raw => write!(f, "raw"),
            SourceLayout::Canonical => write!(f, "canonical"),
        }
    }
}
