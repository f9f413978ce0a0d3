use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use polars::prelude::*;

use crate::error::{DashboardError, Result};
use crate::records::{HeartRecord, Sex, REQUIRED_COLUMNS, SEX};

pub async fn read_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let file = File::open(path)?;

    let df = CsvReader::new(file)
        .has_header(true)
        .with_dtypes(Option::from(Arc::new(HeartRecord::raw_schema())))
        .finish()?;
    Ok(df)
}

/// Replaces the textual `Sex` column with its integer code (F = 0, M = 1).
pub fn encode_sex(df: &mut DataFrame) -> Result<()> {
    let labels = df.column(SEX)?.utf8()?;
    let mut encoded = Vec::with_capacity(labels.len());
    for label in labels.into_iter() {
        encoded.push(Sex::from_label(label.unwrap_or_default())?.code());
    }
    df.with_column(Series::new(SEX, encoded))?;
    Ok(())
}

/// Reads only the header, before any dtype is forced on a column.
fn check_header(path: &Path) -> Result<()> {
    let header = CsvReader::new(File::open(path)?)
        .has_header(true)
        .with_n_rows(Some(0))
        .finish()?;
    let present = header.get_column_names();
    for column in REQUIRED_COLUMNS {
        if !present.contains(&column) {
            return Err(DashboardError::MissingColumn { column: column.to_string() });
        }
    }
    Ok(())
}

/// Reads the patient table and encodes it for the dashboard views.
pub async fn load_patients<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let path = path.as_ref();
    info!("loading patient table from {}", path.display());

    check_header(path)?;
    let mut df = read_csv(path).await?;
    encode_sex(&mut df)?;

    debug!("patient table schema {:?}", df.schema());
    Ok(df)
}
