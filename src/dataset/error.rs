//! Dataset load error types
//!
//! Every variant is fatal: a dataset that fails to load aborts startup.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building the Dataset
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// Source file could not be opened or read
    #[error("Failed to read dataset {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    /// CSV framing error (bad quoting, unreadable header, ...)
    #[error("CSV error at line {line}: {message}")]
    Csv { line: u64, message: String },

    /// A required column is absent from the header row
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A cell could not be parsed into its column type
    #[error("Invalid value {value:?} for column '{column}' at line {line}")]
    InvalidValue {
        line: u64,
        column: String,
        value: String,
    },

    /// Location code is not a three-letter code
    #[error("Invalid iso_alpha code {value:?} at line {line}")]
    InvalidIsoCode { line: u64, value: String },

    /// An in-memory record breaks a row invariant
    #[error("Invalid record {index} ('{country}'): {reason}")]
    InvalidRecord {
        index: usize,
        country: String,
        reason: String,
    },

    /// (country, year) appears more than once
    #[error("Duplicate record for country '{country}' in year {year}")]
    DuplicateKey { country: String, year: i32 },
}

impl From<csv::Error> for DataLoadError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        DataLoadError::Csv {
            line,
            message: err.to_string(),
        }
    }
}

/// Result type alias for dataset loading
pub type DataLoadResult<T> = Result<T, DataLoadError>;
