//! Error types for the employee index ingest.

use employee_index_repository::SearchIndexError;
use thiserror::Error;

/// Errors that can occur while reading, shaping or loading employee data.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The CSV file could not be read from disk.
    #[error("Read error: {0}")]
    ReadError(String),

    /// The CSV content could not be parsed.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A required column is not in the CSV header.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A date cell is not in MM/DD/YYYY form.
    #[error("Invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    /// Error from the loader component.
    #[error("Loader error: {0}")]
    LoaderError(String),

    /// Error from the search engine.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchIndexError),
}

impl IngestError {
    /// Create a read error.
    pub fn read(msg: impl Into<String>) -> Self {
        Self::ReadError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a missing column error.
    pub fn missing_column(msg: impl Into<String>) -> Self {
        Self::MissingColumn(msg.into())
    }

    /// Create an invalid date error.
    pub fn invalid_date(value: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidDate {
            value: value.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a loader error.
    pub fn loader(msg: impl Into<String>) -> Self {
        Self::LoaderError(msg.into())
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}
