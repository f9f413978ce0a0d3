use polars::prelude::PolarsError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("dataframe error: {0}")]
    Polars(#[from] PolarsError),
    #[error("required column {column:?} is missing from the patient table")]
    MissingColumn { column: String },
    #[error("unknown sex label {label:?}, expected M or F")]
    UnknownSexLabel { label: String },
    #[error("could not bind {addr}: {message}")]
    Bind { addr: String, message: String },
    #[error("invalid response header {name:?}")]
    Header { name: String },
    #[error("chart rendering failed: {0}")]
    Chart(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
