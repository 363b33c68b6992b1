//! Error types for tweetstats-core

use thiserror::Error;

/// Main error type for the tweetstats-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A required column is absent and has no fallback
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// A date value could not be parsed; invalidates the whole preparation pass
    #[error("invalid timestamp in row {row}: {value:?}")]
    InvalidTimestamp { row: usize, value: String },

    /// Statistics requested over an empty series
    #[error("cannot compute statistics over an empty series: {0}")]
    EmptySeries(String),

    /// Percent change against a zero reference value
    #[error("reference {metric} is zero for year {year}; percent change is undefined")]
    ZeroBaseline { metric: &'static str, year: i32 },

    /// A source filter selected no records
    #[error("no matching records: {0}")]
    NoMatchingRecords(String),

    /// Input file format could not be determined or is not supported
    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for tweetstats-core
pub type Result<T> = std::result::Result<T, Error>;
