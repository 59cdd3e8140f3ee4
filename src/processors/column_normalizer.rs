use crate::error::Result;
use crate::models::schema::{
    is_reading_column, ColumnRole, SourceLayout, CANONICAL_COLUMNS, RAW_LAYOUT,
};
use crate::models::MeasurementTable;
use polars::prelude::*;
use tracing::debug;

/// Reduces a measurement table to the canonical 17-column schema
pub struct ColumnNormalizer;

impl ColumnNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Drop the declared low-value columns, rename the rest and read the
    /// pollutant and weather columns as numbers.
    ///
    /// Fails with a schema mismatch when the header row is neither the raw
    /// nor the canonical layout. Readings that are not numbers become null.
    pub fn normalize(&self, table: MeasurementTable) -> Result<MeasurementTable> {
        let layout = SourceLayout::detect(&table.column_names())?;
        debug!("Normalizing {} layout", layout);

        let selection: Vec<Expr> = match layout {
            SourceLayout::Raw => table
                .column_names()
                .into_iter()
                .zip(RAW_LAYOUT.iter())
                .filter_map(|(source, declared)| match declared.role {
                    ColumnRole::Keep(name) => Some(canonical_column(source, name)),
                    ColumnRole::Drop(reason) => {
                        debug!("Dropping '{}' ({})", source, reason.description());
                        None
                    }
                })
                .collect(),
            SourceLayout::Canonical => table
                .column_names()
                .into_iter()
                .zip(CANONICAL_COLUMNS.iter())
                .map(|(source, name)| canonical_column(source, name))
                .collect(),
        };

        let frame = table.into_frame().lazy().select(selection).collect()?;
        Ok(MeasurementTable::new(frame))
    }
}

impl Default for ColumnNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn canonical_column(source: &str, name: &str) -> Expr {
    let dtype = if is_reading_column(name) {
        DataType::Float64
    } else {
        DataType::String
    };
    col(source).cast(dtype).alias(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use crate::test_support::{raw_table, text_table, RAW_HEADERS};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_raw_table() {
        let table = raw_table(&["01-Jan-21", "02-Jan-21"]);
        let normalized = ColumnNormalizer::new().normalize(table).unwrap();

        assert_eq!(normalized.column_names(), CANONICAL_COLUMNS.to_vec());
        assert_eq!(normalized.row_count(), 2);
        assert_eq!(normalized.text(1, "From").unwrap(), Some("02-Jan-21"));
        // NOx sits after the dropped NO column
        assert_eq!(normalized.value(0, "NOx(ppb)").unwrap(), Some(14.0));
        assert_eq!(
            normalized.frame().column("PM10(ug/m3)").unwrap().dtype(),
            &DataType::Float64
        );
    }

    #[test]
    fn test_normalize_is_idempotent_on_columns() {
        let normalizer = ColumnNormalizer::new();
        let once = normalizer
            .normalize(raw_table(&["01-Jan-21", "02-Jan-21", "03-Jan-21"]))
            .unwrap();
        let twice = normalizer.normalize(once.clone()).unwrap();

        assert_eq!(twice.column_names(), once.column_names());
        assert!(twice.frame().equals_missing(once.frame()));
    }

    #[test]
    fn test_canonical_variants_renamed() {
        let renamed: Vec<String> = CANONICAL_COLUMNS
            .iter()
            .map(|name| name.replace("(ug/m3)", " (µg/m³)"))
            .collect();
        let columns: Vec<(&str, &[Option<&str>])> = renamed
            .iter()
            .map(|name| (name.as_str(), &[Some("1")][..]))
            .collect();
        let table = text_table(&columns);

        let normalized = ColumnNormalizer::new().normalize(table).unwrap();
        assert_eq!(normalized.column_names(), CANONICAL_COLUMNS.to_vec());
    }

    #[test]
    fn test_unparseable_reading_becomes_null() {
        let mut table = raw_table(&["01-Jan-21", "02-Jan-21"]);
        let pm10 = Series::new("PM10".into(), &["41.5", "Calibration"]);
        table.frame_mut().with_column(pm10).unwrap();

        let normalized = ColumnNormalizer::new().normalize(table).unwrap();

        assert_eq!(normalized.value(0, "PM10(ug/m3)").unwrap(), Some(41.5));
        assert_eq!(normalized.value(1, "PM10(ug/m3)").unwrap(), None);
    }

    #[test]
    fn test_schema_mismatch() {
        let reversed: Vec<(&str, &[Option<&str>])> = RAW_HEADERS
            .iter()
            .rev()
            .map(|name| (*name, &[Some("1")][..]))
            .collect();
        let table = text_table(&reversed);

        let result = ColumnNormalizer::new().normalize(table);
        assert!(matches!(result, Err(ProcessingError::SchemaMismatch { .. })));
    }
}
