use polars::prelude::*;

use crate::error::Result;

pub const EXPORT_FILE_NAME: &str = "heartdiseasedata.csv";
pub const EXPORT_MIME: &str = "text/csv";

/// Serializes the whole table as CSV with a leading, unnamed row index column.
pub fn to_csv_bytes(df: &DataFrame) -> Result<Vec<u8>> {
    let mut indexed = df.with_row_count("", None)?;
    let mut buffer: Vec<u8> = Vec::new();
    CsvWriter::new(&mut buffer).has_header(true).finish(&mut indexed)?;
    Ok(buffer)
}
