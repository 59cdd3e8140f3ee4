//! Fixtures shared by unit tests.

use crate::models::schema::RAW_COLUMN_COUNT;
use crate::models::MeasurementTable;
use polars::prelude::*;

pub const RAW_HEADERS: [&str; RAW_COLUMN_COUNT] = [
    "Station Name",
    "From",
    "FT",
    "To",
    "TT",
    "PM10",
    "PM2.5",
    "AT()",
    "BP(mmHg)",
    "SR(W/mt2)",
    "RH(%)",
    "WD(degree)",
    "RF(mm)",
    "NO(ug/m3)",
    "NOx(ppb)",
    "NO2(ug/m3)",
    "NH3(ug/m3)",
    "SO2(ug/m3)",
    "CO(mg/m3)",
    "Ozone(ug/m3)",
    "Benzene()",
    "Toluene()",
    "Xylene()",
    "MP-Xylene()",
    "Eth-Xylene()",
];

/// Table of text columns as the reader produces them; `None` is a null cell
pub fn text_table(columns: &[(&str, &[Option<&str>])]) -> MeasurementTable {
    let columns = columns
        .iter()
        .map(|(name, cells)| Series::new((*name).into(), cells.to_vec()).into_column())
        .collect();

    MeasurementTable::new(DataFrame::new(columns).expect("fixture columns have equal length"))
}

/// Raw 25-column table for station "Alipur", one row per date.
///
/// Reading columns hold their raw position as the value, so `NOx(ppb)` is "14".
pub fn raw_table(dates: &[&str]) -> MeasurementTable {
    let columns = RAW_HEADERS
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let cells: Vec<String> = dates
                .iter()
                .map(|date| match idx {
                    0 => "Alipur".to_string(),
                    1 | 3 => date.to_string(),
                    2 => "00:00".to_string(),
                    4 => "01:00".to_string(),
                    _ => idx.to_string(),
                })
                .collect();
            Series::new((*header).into(), cells).into_column()
        })
        .collect();

    MeasurementTable::new(DataFrame::new(columns).expect("fixture columns have equal length"))
}
