//! # Employee Index Shared
//!
//! Shared types for the employee index: the CSV-backed employee record,
//! the dynamic document that is sent to the search engine, and the
//! result types returned by search and aggregation queries.

pub mod document;
pub mod employee;
pub mod fields;
pub mod search;

pub use document::EmployeeDocument;
pub use employee::EmployeeRecord;
pub use search::{FacetBucket, SearchHit, SearchResponse};
