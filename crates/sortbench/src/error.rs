//! Error types for the sorting comparison

use thiserror::Error;

/// Result type alias using [`SortError`]
pub type Result<T> = std::result::Result<T, SortError>;

#[derive(Error, Debug, PartialEq)]
pub enum SortError {
    #[error("Record {index} has no field '{key}'")]
    MissingKey { index: usize, key: String },

    #[error("Sort results differ for {size} records on key '{key}'")]
    Mismatch { size: usize, key: String },
}
