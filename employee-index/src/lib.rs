//! # Employee Index
//!
//! Library behind the `employee-index` binary: configuration, dependency
//! wiring, logging setup and the two end-to-end workflows (full index and
//! collection tasks).

pub mod config;
pub mod logging;
pub mod output;
pub mod workflows;

pub use config::{Dependencies, Settings};

use employee_index_ingest::IngestError;
use employee_index_repository::SearchIndexError;
use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Reading or shaping the CSV failed.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchIndexError),

    /// Failed to render results.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
