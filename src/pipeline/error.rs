//! Selection error types
//!
//! Raised before the pipeline runs when a selection refers to values
//! outside the dataset's domains. Empty selections are not errors.

use thiserror::Error;

/// Errors that reject a filter selection
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// Metric is not one of pop, lifeExp, gdpPercap
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// Year is neither an integer nor "All"
    #[error("Invalid year: {0}")]
    InvalidYear(String),

    /// Year does not occur in the dataset
    #[error("Year not in dataset: {0}")]
    UnknownYear(i32),

    /// Continent does not occur in the dataset
    #[error("Continent not in dataset: {0}")]
    UnknownContinent(String),
}

/// Result type for selection handling
pub type SelectionResult<T> = Result<T, SelectionError>;
