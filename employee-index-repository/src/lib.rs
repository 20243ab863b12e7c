//! # Employee Index Repository
//!
//! This crate provides traits and implementations for interacting with the
//! search engine. It includes definitions for errors, interfaces, a concrete
//! implementation for OpenSearch, and the `SearchIndexClient` used by the
//! application to run employee operations against any provider.

pub mod client;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use client::SearchIndexClient;
pub use config::SearchIndexConfig;
pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use opensearch::{IndexMapping, OpenSearchClient};
pub use types::{BatchOperationResult, BatchOperationSummary, DeleteOutcome, IndexState};
