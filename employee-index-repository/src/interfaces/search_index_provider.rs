//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchIndexError;
use crate::opensearch::IndexMapping;
use employee_index_shared::{EmployeeDocument, FacetBucket, SearchResponse};

/// Abstracts the underlying search index implementation (OpenSearch, Elasticsearch, etc.).
///
/// This trait defines the interface for all search index backend implementations. Implementations
/// are injected into `SearchIndexClient` to enable dependency injection and easy testing with
/// mock implementations.
///
/// Query bodies are plain JSON built by the functions in `opensearch::queries`.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Check whether an index exists.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the index exists
    /// * `Ok(false)` - If it does not
    /// * `Err(SearchIndexError)` - If the check itself fails
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError>;

    /// Create an index with the given settings and mappings.
    ///
    /// # Arguments
    ///
    /// * `index` - Name of the index to create
    /// * `mapping` - Body sent with the create request
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index was created
    /// * `Err(SearchIndexError::IndexCreationError)` - If the engine rejected the request
    async fn create_index(&self, index: &str, mapping: &IndexMapping)
        -> Result<(), SearchIndexError>;

    /// Delete an index and all of its documents.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index was deleted
    /// * `Err(SearchIndexError::IndexNotFound)` - If there was no such index
    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Index a single document. The engine assigns the document ID.
    async fn index_document(
        &self,
        index: &str,
        document: &EmployeeDocument,
    ) -> Result<(), SearchIndexError>;

    /// Execute a search request and return its hits.
    async fn search(&self, index: &str, query: &Value) -> Result<SearchResponse, SearchIndexError>;

    /// Count the documents in an index that match the query.
    async fn count(&self, index: &str, query: &Value) -> Result<u64, SearchIndexError>;

    /// Delete every document matching the query.
    ///
    /// # Returns
    ///
    /// * `Ok(u64)` - Number of deleted documents, possibly zero
    /// * `Err(SearchIndexError::IndexNotFound)` - If there was no such index
    async fn delete_by_query(&self, index: &str, query: &Value) -> Result<u64, SearchIndexError>;

    /// Run an aggregation query and return the buckets of the named terms aggregation.
    async fn terms_facet(
        &self,
        index: &str,
        query: &Value,
        aggregation: &str,
    ) -> Result<Vec<FacetBucket>, SearchIndexError>;

    /// Make all recent writes visible to search and count.
    async fn refresh(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Check if the search engine is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the cluster status is green or yellow
    /// * `Ok(false)` - If the cluster is red or reports no status
    /// * `Err(SearchIndexError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchIndexError>;
}
