//! # Employee Index Ingest
//!
//! This crate provides the ingest components for reading employee records
//! from CSV and indexing them into OpenSearch.
//!
//! ## Architecture
//!
//! The ingest follows the Reader-Processor-Loader pattern:
//!
//! 1. **Reader**: Reads and decodes the CSV file
//! 2. **Processor**: Cleans rows and shapes them into search documents
//! 3. **Loader**: Indexes documents into OpenSearch

pub mod errors;
pub mod loader;
pub mod processor;
pub mod reader;

pub use errors::IngestError;
pub use loader::EmployeeLoader;
pub use processor::{normalize_date, CleanTable, DocumentShaper, ShapeOptions};
pub use reader::{EmployeeCsv, SourceEncoding};
