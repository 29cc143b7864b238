// Dashboard error types
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to read dataset {path}: {source}")]
    DatasetIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("dataset row {row}: {message}")]
    InvalidRow { row: usize, message: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid date range: start {start} is after end {end}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("unknown period '{0}', expected daily, weekly, monthly or yearly")]
    UnknownGranularity(String),
}
