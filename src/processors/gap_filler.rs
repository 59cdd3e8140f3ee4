use crate::error::Result;
use crate::models::MeasurementTable;
use crate::utils::constants::CONSTANT_FILL_VALUE;
use polars::prelude::*;

/// Number of cells filled by each pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillStats {
    pub forward: usize,
    pub backward: usize,
    pub constant: usize,
}

impl FillStats {
    pub fn total(&self) -> usize {
        self.forward + self.backward + self.constant
    }
}

/// Forward fill, then backward fill, then constant fill, per column
pub struct GapFiller {
    constant: f64,
}

impl GapFiller {
    pub fn new() -> Self {
        Self::with_constant(CONSTANT_FILL_VALUE)
    }

    pub fn with_constant(constant: f64) -> Self {
        Self { constant }
    }

    /// Fill every null cell of the table
    pub fn fill(&self, table: MeasurementTable) -> Result<(MeasurementTable, FillStats)> {
        let mut stats = FillStats::default();
        let mut frame = table.into_frame();

        let names: Vec<String> = frame
            .get_column_names_str()
            .into_iter()
            .map(str::to_string)
            .collect();

        for name in &names {
            let series = frame.column(name)?.as_materialized_series();
            let missing = series.null_count();
            if missing == 0 {
                continue;
            }

            let forward = series.fill_null(FillNullStrategy::Forward(None))?;
            let after_forward = forward.null_count();
            let backward = forward.fill_null(FillNullStrategy::Backward(None))?;

            stats.forward += missing - after_forward;
            stats.backward += after_forward - backward.null_count();
            frame.with_column(backward)?;
        }

        // Only columns with no value at all are left
        let mut constant_fills = Vec::new();
        for column in frame.get_columns() {
            let missing = column.null_count();
            if missing == 0 {
                continue;
            }
            stats.constant += missing;

            let value = if column.dtype() == &DataType::String {
                lit(self.constant).cast(DataType::String)
            } else {
                lit(self.constant)
            };
            constant_fills.push(col(column.name().as_str()).fill_null(value));
        }

        if !constant_fills.is_empty() {
            frame = frame.lazy().with_columns(constant_fills).collect()?;
        }

        Ok((MeasurementTable::new(frame), stats))
    }
}

impl Default for GapFiller {
    fn default() -> Self {
        Self::new()
    }
}
