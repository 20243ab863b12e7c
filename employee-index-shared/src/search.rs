//! Search and aggregation result types.

use serde::{Deserialize, Serialize};

use crate::document::EmployeeDocument;

/// A single matched document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Engine-assigned document ID.
    pub id: String,
    /// Relevance score. Absent for queries that do not score.
    pub score: Option<f64>,
    /// The indexed document.
    pub source: EmployeeDocument,
}

/// Hits returned by a query along with the total match count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Total number of matching documents, which may exceed `hits.len()`.
    pub total: u64,
    pub hits: Vec<SearchHit>,
}

/// One bucket of a terms aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetBucket {
    pub key: String,
    pub doc_count: u64,
}
