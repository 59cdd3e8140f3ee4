use crate::error::{ProcessingError, Result};
use crate::models::{MeasurementTable, Season};
use crate::utils::constants::{DATE_COLUMN, ONE_HOT_SET, ONE_HOT_UNSET};
use polars::prelude::*;

/// Season of a `DD-Mon-YY` observation date, taken from the month token alone.
///
/// Only the shape and the month are checked, so `29-Feb-21` is a Winter date.
pub fn observation_season(value: &str) -> std::result::Result<Season, String> {
    let parts: Vec<&str> = value.trim().split('-').collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(format!("expected 3 '-'-separated parts, found {}", parts.len()));
    };
    if day.is_empty() || year.is_empty() {
        return Err("day or year is empty".to_string());
    }

    Season::from_abbreviation(month).ok_or_else(|| format!("unknown month '{}'", month))
}

/// Appends one-hot season columns derived from the observation date
pub struct SeasonTagger {
    date_column: String,
}

impl SeasonTagger {
    pub fn new() -> Self {
        Self::with_date_column(DATE_COLUMN)
    }

    pub fn with_date_column(date_column: impl Into<String>) -> Self {
        Self {
            date_column: date_column.into(),
        }
    }

    /// Season of every row; the first unusable date aborts with its row index
    pub fn seasons(&self, table: &MeasurementTable) -> Result<Vec<Season>> {
        let column = table.frame().column(&self.date_column).map_err(|_| {
            ProcessingError::MissingData(format!("Date column '{}' not found", self.date_column))
        })?;

        column
            .as_materialized_series()
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, cell)| {
                let value = cell.ok_or_else(|| ProcessingError::DateParse {
                    row,
                    value: String::new(),
                    reason: "date is missing".to_string(),
                })?;

                observation_season(value).map_err(|reason| ProcessingError::DateParse {
                    row,
                    value: value.to_string(),
                    reason,
                })
            })
            .collect()
    }

    /// Append the four season columns; the table is untouched on error
    pub fn tag(&self, table: &mut MeasurementTable) -> Result<()> {
        let seasons = self.seasons(table)?;

        for season in Season::COLUMN_ORDER {
            let flags: Vec<i32> = seasons
                .iter()
                .map(|s| if *s == season { ONE_HOT_SET } else { ONE_HOT_UNSET })
                .collect();
            table
                .frame_mut()
                .with_column(Series::new(season.column_name().into(), flags))?;
        }

        Ok(())
    }
}

impl Default for SeasonTagger {
    fn default() -> Self {
        Self::new()
    }
}
