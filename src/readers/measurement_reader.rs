use crate::error::Result;
use crate::models::MeasurementTable;
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, DEFAULT_HEADER_ROW, MISSING_TOKENS};
use encoding_rs::{Encoding, WINDOWS_1252};
use memmap2::Mmap;
use polars::prelude::*;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;
use tracing::debug;

/// Reads one station's measurement CSV into a [`MeasurementTable`]
pub struct MeasurementReader {
    header_row: usize,
    use_mmap: bool,
}

impl MeasurementReader {
    pub fn new() -> Self {
        Self {
            header_row: DEFAULT_HEADER_ROW,
            use_mmap: false,
        }
    }

    /// Zero-based line index of the header; earlier lines are skipped
    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub fn read_table(&self, path: &Path) -> Result<MeasurementTable> {
        let text = if self.use_mmap {
            self.read_text_mmap(path)?
        } else {
            self.read_text_buffered(path)?
        };

        let table = self.parse_table(&text)?;
        debug!(
            "Read {} rows x {} columns from {}",
            table.row_count(),
            table.column_count(),
            path.display()
        );
        Ok(table)
    }

    fn read_text_buffered(&self, path: &Path) -> Result<String> {
        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(decode_bytes(&bytes))
    }

    /// Memory-mapped read for large exports
    fn read_text_mmap(&self, path: &Path) -> Result<String> {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(String::new());
        }
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(decode_bytes(&mmap))
    }

    /// Parse CSV text with the header on line `header_row`; every column is read as text
    pub fn parse_table(&self, text: &str) -> Result<MeasurementTable> {
        let null_values = NullValues::AllColumns(
            MISSING_TOKENS.iter().map(|token| PlSmallStr::from(*token)).collect(),
        );

        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_skip_rows(self.header_row)
            .with_infer_schema_length(Some(0))
            .with_parse_options(
                CsvParseOptions::default()
                    .with_null_values(Some(null_values))
                    .with_missing_is_null(true),
            )
            .into_reader_with_file_handle(Cursor::new(text.as_bytes().to_vec()))
            .finish()?;

        Ok(MeasurementTable::new(frame))
    }
}

impl Default for MeasurementReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode file bytes: BOM first, then UTF-8, then Windows-1252 for legacy exports
pub fn decode_bytes(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text.into_owned();
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            text.into_owned()
        }
    }
}
