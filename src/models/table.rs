use crate::error::Result;
use polars::prelude::*;

/// One station's observations, backed by a polars frame
#[derive(Debug, Clone)]
pub struct MeasurementTable {
    frame: DataFrame,
}

impl MeasurementTable {
    pub fn new(frame: DataFrame) -> Self {
        Self { frame }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut DataFrame {
        &mut self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn row_count(&self) -> usize {
        self.frame.height()
    }

    pub fn column_count(&self) -> usize {
        self.frame.width()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.frame.get_column_names_str()
    }

    /// Fraction of null cells per column; an empty table reports 0 everywhere
    pub fn missing_ratios(&self) -> Vec<(&str, f64)> {
        let height = self.frame.height();
        self.frame
            .get_columns()
            .iter()
            .map(|column| {
                let ratio = if height == 0 {
                    0.0
                } else {
                    column.null_count() as f64 / height as f64
                };
                (column.name().as_str(), ratio)
            })
            .collect()
    }

    pub fn missing_cells(&self) -> usize {
        self.frame.get_columns().iter().map(|c| c.null_count()).sum()
    }

    /// Cell of a text column
    pub fn text(&self, row: usize, column: &str) -> Result<Option<&str>> {
        let values = self.frame.column(column)?.as_materialized_series().str()?;
        Ok(values.get(row))
    }

    /// Cell of any column read as a number; text that does not parse is `None`
    pub fn value(&self, row: usize, column: &str) -> Result<Option<f64>> {
        let values = self
            .frame
            .column(column)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        Ok(values.f64()?.get(row))
    }
}

impl From<DataFrame> for MeasurementTable {
    fn from(frame: DataFrame) -> Self {
        Self::new(frame)
    }
}
