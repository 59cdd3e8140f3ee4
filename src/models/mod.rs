pub mod schema;
pub mod season;
pub mod station;
pub mod table;

pub use schema::{
    is_reading_column, ColumnRole, DropReason, InputColumn, SourceLayout, CANONICAL_COLUMNS,
    RAW_LAYOUT,
};
pub use season::Season;
pub use station::StationLocation;
pub use table::MeasurementTable;
