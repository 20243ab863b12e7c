//! Error types for the employee index repository.

mod search_index_error;

pub use search_index_error::SearchIndexError;
