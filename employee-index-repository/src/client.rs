//! Search index client implementation.
//!
//! This module provides the main client for interacting with the search index.
//! Application code uses this to manage indices, load documents and run the
//! employee queries.

use tracing::{debug, info, warn};

use crate::config::SearchIndexConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::queries::{
    build_count_query, build_delete_by_match_query, build_match_query, build_terms_facet_query,
    DEPARTMENT_FACET,
};
use crate::opensearch::IndexMapping;
use crate::types::{BatchOperationSummary, DeleteOutcome, IndexState};
use employee_index_shared::{fields, EmployeeDocument, FacetBucket, SearchHit};

/// The main client for interacting with the search index.
pub struct SearchIndexClient {
    provider: Box<dyn SearchIndexProvider>,
    config: SearchIndexConfig,
}

fn require(value: &str, what: &str) -> Result<(), SearchIndexError> {
    if value.trim().is_empty() {
        return Err(SearchIndexError::validation(format!("{} is required", what)));
    }
    Ok(())
}

impl SearchIndexClient {
    /// Create a new SearchIndexClient with default configuration.
    pub fn new(provider: Box<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            config: SearchIndexConfig::default(),
        }
    }

    /// Create a new SearchIndexClient with custom configuration.
    pub fn with_config(provider: Box<dyn SearchIndexProvider>, config: SearchIndexConfig) -> Self {
        Self { provider, config }
    }

    /// Check if batch size exceeds the configured limit.
    fn validate_batch_size(&self, size: usize) -> Result<(), SearchIndexError> {
        if let Some(max) = self.config.max_batch_size {
            if size > max {
                return Err(SearchIndexError::validation(format!(
                    "Batch size {} exceeds maximum {}",
                    size, max
                )));
            }
        }
        Ok(())
    }

    /// Drop the index if it exists, then create it with the given mapping.
    pub async fn recreate_index(
        &self,
        index: &str,
        mapping: &IndexMapping,
    ) -> Result<(), SearchIndexError> {
        require(index, "index name")?;

        if self.provider.index_exists(index).await? {
            self.provider.delete_index(index).await?;
            info!(index = %index, "Deleted existing index");
        }

        self.provider.create_index(index, mapping).await?;
        info!(index = %index, "Created index");
        Ok(())
    }

    /// Create the index unless it already exists.
    ///
    /// An existing index is left as it is, even if its mapping differs.
    pub async fn ensure_index(
        &self,
        index: &str,
        mapping: &IndexMapping,
    ) -> Result<IndexState, SearchIndexError> {
        require(index, "index name")?;

        if self.provider.index_exists(index).await? {
            info!(index = %index, "Collection already exists");
            return Ok(IndexState::AlreadyExists);
        }

        self.provider.create_index(index, mapping).await?;
        info!(index = %index, "Collection created with custom mapping");
        Ok(IndexState::Created)
    }

    /// Index documents one at a time.
    ///
    /// A failing document is recorded in the summary and the rest are still
    /// sent. When `refresh_after_write` is set the index is refreshed once
    /// at the end so the new documents are visible to count and search. A
    /// failed refresh is logged; the documents are already indexed, so the
    /// summary is still returned.
    pub async fn index_documents(
        &self,
        index: &str,
        documents: &[EmployeeDocument],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        require(index, "index name")?;

        if documents.is_empty() {
            return Ok(BatchOperationSummary::default());
        }

        self.validate_batch_size(documents.len())?;

        let mut summary = BatchOperationSummary::default();
        for (position, document) in documents.iter().enumerate() {
            let employee_id = fields::ID_COLUMNS
                .iter()
                .find_map(|column| document.get_str(column))
                .map(str::to_string);

            let outcome = self.provider.index_document(index, document).await;
            if let Err(ref e) = outcome {
                warn!(
                    index = %index,
                    position = position,
                    employee_id = ?employee_id,
                    error = %e,
                    "Failed to index document"
                );
            }
            summary.record(position, employee_id, outcome);
        }

        if self.config.refresh_after_write {
            if let Err(e) = self.provider.refresh(index).await {
                warn!(index = %index, error = %e, "Failed to refresh index after indexing");
            }
        }

        debug!(
            index = %index,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Indexed documents"
        );
        Ok(summary)
    }

    /// Full-text match of `value` against `column`.
    pub async fn search_by_column(
        &self,
        index: &str,
        column: &str,
        value: &str,
    ) -> Result<Vec<SearchHit>, SearchIndexError> {
        require(index, "index name")?;
        require(column, "column name")?;

        let query = build_match_query(column, value, None);
        let response = self.provider.search(index, &query).await?;
        Ok(response.hits)
    }

    /// Number of documents in the index.
    pub async fn employee_count(&self, index: &str) -> Result<u64, SearchIndexError> {
        require(index, "index name")?;
        self.provider.count(index, &build_count_query()).await
    }

    /// Delete every document whose `id_field` matches `employee_id`.
    ///
    /// A missing index or zero matches is reported as `DeleteOutcome::NotFound`
    /// rather than an error.
    pub async fn delete_employee_by_id(
        &self,
        index: &str,
        id_field: &str,
        employee_id: &str,
    ) -> Result<DeleteOutcome, SearchIndexError> {
        require(index, "index name")?;
        require(id_field, "id field")?;
        require(employee_id, "employee id")?;

        let query = build_delete_by_match_query(id_field, employee_id);
        match self.provider.delete_by_query(index, &query).await {
            Ok(0) => {
                info!(index = %index, employee_id = %employee_id, "Employee not found");
                Ok(DeleteOutcome::NotFound)
            }
            Ok(deleted) => {
                if self.config.refresh_after_write {
                    self.provider.refresh(index).await?;
                }
                info!(
                    index = %index,
                    employee_id = %employee_id,
                    deleted = deleted,
                    "Employee deleted"
                );
                Ok(DeleteOutcome::Deleted(deleted))
            }
            Err(e) if e.is_not_found() => {
                info!(index = %index, employee_id = %employee_id, "Employee not found");
                Ok(DeleteOutcome::NotFound)
            }
            Err(e) => Err(e),
        }
    }

    /// Document counts per department.
    ///
    /// The mapping decides whether to aggregate on `Department` itself or on
    /// its `.keyword` sub-field.
    pub async fn department_facet(
        &self,
        index: &str,
        mapping: &IndexMapping,
    ) -> Result<Vec<FacetBucket>, SearchIndexError> {
        require(index, "index name")?;

        let field = mapping.facet_field(fields::DEPARTMENT);
        let query = build_terms_facet_query(DEPARTMENT_FACET, &field, self.config.facet_size);
        self.provider
            .terms_facet(index, &query, DEPARTMENT_FACET)
            .await
    }

    /// Check if the search engine is healthy and reachable.
    pub async fn health_check(&self) -> Result<bool, SearchIndexError> {
        self.provider.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use employee_index_shared::SearchResponse;
    use serde_json::{json, Value};
    use std::collections::HashSet;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Mock provider for testing
    #[derive(Clone, Default)]
    struct MockProvider {
        existing: Arc<Mutex<HashSet<String>>>,
        created: Arc<Mutex<Vec<(String, IndexMapping)>>>,
        deleted_indices: Arc<Mutex<Vec<String>>>,
        indexed_documents: Arc<Mutex<Vec<(String, EmployeeDocument)>>>,
        queries: Arc<Mutex<Vec<Value>>>,
        refreshes: Arc<Mutex<Vec<String>>>,
        fail_on_employee: Option<String>,
        deleted_by_query: u64,
        should_fail: bool,
        fail_refresh: bool,
    }

    impl MockProvider {
        fn with_index(index: &str) -> Self {
            let provider = Self::default();
            provider
                .existing
                .try_lock()
                .unwrap()
                .insert(index.to_string());
            provider
        }
    }

    #[async_trait]
    impl SearchIndexProvider for MockProvider {
        async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
            Ok(self.existing.lock().await.contains(index))
        }

        async fn create_index(
            &self,
            index: &str,
            mapping: &IndexMapping,
        ) -> Result<(), SearchIndexError> {
            if self.should_fail {
                return Err(SearchIndexError::index_creation("Mock failure"));
            }
            self.existing.lock().await.insert(index.to_string());
            self.created
                .lock()
                .await
                .push((index.to_string(), mapping.clone()));
            Ok(())
        }

        async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
            if !self.existing.lock().await.remove(index) {
                return Err(SearchIndexError::index_not_found(index));
            }
            self.deleted_indices.lock().await.push(index.to_string());
            Ok(())
        }

        async fn index_document(
            &self,
            index: &str,
            document: &EmployeeDocument,
        ) -> Result<(), SearchIndexError> {
            if let Some(ref bad) = self.fail_on_employee {
                if document.get_str(fields::EMPLOYEE_ID) == Some(bad.as_str()) {
                    return Err(SearchIndexError::index("Mock failure"));
                }
            }
            self.indexed_documents
                .lock()
                .await
                .push((index.to_string(), document.clone()));
            Ok(())
        }

        async fn search(
            &self,
            _index: &str,
            query: &Value,
        ) -> Result<SearchResponse, SearchIndexError> {
            self.queries.lock().await.push(query.clone());
            let mut source = EmployeeDocument::new();
            source.insert(fields::DEPARTMENT, "IT");
            Ok(SearchResponse {
                total: 1,
                hits: vec![SearchHit {
                    id: "hit-1".to_string(),
                    score: Some(1.0),
                    source,
                }],
            })
        }

        async fn count(&self, index: &str, query: &Value) -> Result<u64, SearchIndexError> {
            self.queries.lock().await.push(query.clone());
            Ok(self
                .indexed_documents
                .lock()
                .await
                .iter()
                .filter(|(i, _)| i == index)
                .count() as u64)
        }

        async fn delete_by_query(
            &self,
            index: &str,
            query: &Value,
        ) -> Result<u64, SearchIndexError> {
            if !self.existing.lock().await.contains(index) {
                return Err(SearchIndexError::index_not_found(index));
            }
            if self.should_fail {
                return Err(SearchIndexError::delete("Mock failure"));
            }
            self.queries.lock().await.push(query.clone());
            Ok(self.deleted_by_query)
        }

        async fn terms_facet(
            &self,
            _index: &str,
            query: &Value,
            _aggregation: &str,
        ) -> Result<Vec<FacetBucket>, SearchIndexError> {
            self.queries.lock().await.push(query.clone());
            Ok(vec![FacetBucket {
                key: "IT".to_string(),
                doc_count: 3,
            }])
        }

        async fn refresh(&self, index: &str) -> Result<(), SearchIndexError> {
            if self.fail_refresh {
                return Err(SearchIndexError::unknown("refresh timed out"));
            }
            self.refreshes.lock().await.push(index.to_string());
            Ok(())
        }

        async fn health_check(&self) -> Result<bool, SearchIndexError> {
            Ok(!self.should_fail)
        }
    }

    fn employee(id: &str) -> EmployeeDocument {
        let mut document = EmployeeDocument::new();
        document.insert(fields::EMPLOYEE_ID, id);
        document.insert(fields::GENDER, "Female");
        document
    }

    #[tokio::test]
    async fn test_recreate_index_deletes_existing() {
        let provider = MockProvider::with_index("employee_index");
        let client = SearchIndexClient::new(Box::new(provider.clone()));

        client
            .recreate_index("employee_index", &IndexMapping::full_employee())
            .await
            .unwrap();

        assert_eq!(*provider.deleted_indices.lock().await, vec!["employee_index"]);
        let created = provider.created.lock().await;
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].1, IndexMapping::full_employee());
    }

    #[tokio::test]
    async fn test_recreate_index_when_absent() {
        let provider = MockProvider::default();
        let client = SearchIndexClient::new(Box::new(provider.clone()));

        client
            .recreate_index("employee_index", &IndexMapping::full_employee())
            .await
            .unwrap();

        assert!(provider.deleted_indices.lock().await.is_empty());
        assert_eq!(provider.created.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_ensure_index() {
        let provider = MockProvider::with_index("2706");
        let client = SearchIndexClient::new(Box::new(provider.clone()));

        let state = client
            .ensure_index("jai_hash", &IndexMapping::collection())
            .await
            .unwrap();
        assert_eq!(state, IndexState::Created);

        let state = client
            .ensure_index("2706", &IndexMapping::collection())
            .await
            .unwrap();
        assert_eq!(state, IndexState::AlreadyExists);

        assert_eq!(provider.created.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_ensure_index_validation() {
        let client = SearchIndexClient::new(Box::new(MockProvider::default()));

        let result = client.ensure_index("  ", &IndexMapping::collection()).await;
        assert!(matches!(result, Err(SearchIndexError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_index_documents_empty() {
        let provider = MockProvider::default();
        let client = SearchIndexClient::new(Box::new(provider.clone()));

        let summary = client.index_documents("jai_hash", &[]).await.unwrap();

        assert_eq!(summary.total, 0);
        assert!(summary.results.is_empty());
        assert!(provider.refreshes.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_index_documents_refreshes_once() {
        let provider = MockProvider::default();
        let client = SearchIndexClient::new(Box::new(provider.clone()));

        let documents = vec![employee("E02001"), employee("E02002"), employee("E02003")];
        let summary = client.index_documents("jai_hash", &documents).await.unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.results[2].employee_id.as_deref(), Some("E02003"));
        assert_eq!(provider.indexed_documents.lock().await.len(), 3);
        assert_eq!(*provider.refreshes.lock().await, vec!["jai_hash"]);
    }

    #[tokio::test]
    async fn test_index_documents_keeps_summary_when_refresh_fails() {
        let provider = MockProvider {
            fail_refresh: true,
            ..Default::default()
        };
        let client = SearchIndexClient::new(Box::new(provider.clone()));

        let documents = vec![employee("E02001"), employee("E02002")];
        let summary = client.index_documents("jai_hash", &documents).await.unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(provider.indexed_documents.lock().await.len(), 2);
        assert!(provider.refreshes.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_index_documents_without_refresh() {
        let provider = MockProvider::default();
        let config = SearchIndexConfig::default().without_refresh();
        let client = SearchIndexClient::with_config(Box::new(provider.clone()), config);

        client
            .index_documents("jai_hash", &[employee("E02001")])
            .await
            .unwrap();

        assert!(provider.refreshes.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_index_documents_partial_failure() {
        let provider = MockProvider {
            fail_on_employee: Some("E02002".to_string()),
            ..MockProvider::default()
        };
        let client = SearchIndexClient::new(Box::new(provider.clone()));

        let documents = vec![employee("E02001"), employee("E02002"), employee("E02003")];
        let summary = client.index_documents("jai_hash", &documents).await.unwrap();

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        let failed: Vec<_> = summary.failures().collect();
        assert_eq!(failed[0].position, 1);
        assert_eq!(failed[0].employee_id.as_deref(), Some("E02002"));
        // The document after the failure was still sent
        assert_eq!(provider.indexed_documents.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_index_documents_batch_size_exceeded() {
        let config = SearchIndexConfig::with_max_batch_size(2);
        let client = SearchIndexClient::with_config(Box::new(MockProvider::default()), config);

        let documents: Vec<EmployeeDocument> =
            (0..5).map(|i| employee(&format!("E0200{}", i))).collect();

        let result = client.index_documents("jai_hash", &documents).await;
        assert!(matches!(result, Err(SearchIndexError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_search_by_column() {
        let provider = MockProvider::default();
        let client = SearchIndexClient::new(Box::new(provider.clone()));

        let hits = client
            .search_by_column("2706", "Department", "IT")
            .await
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].source.get_str("Department"), Some("IT"));
        let queries = provider.queries.lock().await;
        assert_eq!(queries[0], json!({"query": {"match": {"Department": "IT"}}}));
    }

    #[tokio::test]
    async fn test_search_by_column_validation() {
        let client = SearchIndexClient::new(Box::new(MockProvider::default()));

        let result = client.search_by_column("2706", "", "IT").await;
        assert!(matches!(result, Err(SearchIndexError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_employee_count() {
        let provider = MockProvider::default();
        let client = SearchIndexClient::new(Box::new(provider.clone()));

        client
            .index_documents("jai_hash", &[employee("E02001"), employee("E02002")])
            .await
            .unwrap();

        assert_eq!(client.employee_count("jai_hash").await.unwrap(), 2);
        assert_eq!(client.employee_count("2706").await.unwrap(), 0);

        let queries = provider.queries.lock().await;
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0], json!({"query": {"match_all": {}}}));
    }

    #[tokio::test]
    async fn test_delete_employee_by_id() {
        let provider = MockProvider {
            deleted_by_query: 1,
            ..MockProvider::with_index("jai_hash")
        };
        let client = SearchIndexClient::new(Box::new(provider.clone()));

        let outcome = client
            .delete_employee_by_id("jai_hash", "Employee ID", "E02003")
            .await
            .unwrap();

        assert_eq!(outcome, DeleteOutcome::Deleted(1));
        assert_eq!(
            provider.queries.lock().await[0],
            json!({"query": {"match": {"Employee ID": "E02003"}}})
        );
        assert_eq!(*provider.refreshes.lock().await, vec!["jai_hash"]);
    }

    #[tokio::test]
    async fn test_delete_employee_no_match() {
        let provider = MockProvider::with_index("jai_hash");
        let client = SearchIndexClient::new(Box::new(provider.clone()));

        let outcome = client
            .delete_employee_by_id("jai_hash", "employee_id", "E99999")
            .await
            .unwrap();

        assert_eq!(outcome, DeleteOutcome::NotFound);
        assert!(provider.refreshes.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_employee_missing_index() {
        let client = SearchIndexClient::new(Box::new(MockProvider::default()));

        let outcome = client
            .delete_employee_by_id("missing", "employee_id", "E02003")
            .await
            .unwrap();

        assert_eq!(outcome, DeleteOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_delete_employee_other_errors_propagate() {
        let provider = MockProvider {
            should_fail: true,
            ..MockProvider::with_index("jai_hash")
        };
        let client = SearchIndexClient::new(Box::new(provider));

        let result = client
            .delete_employee_by_id("jai_hash", "employee_id", "E02003")
            .await;
        assert!(matches!(result, Err(SearchIndexError::DeleteError(_))));
    }

    #[tokio::test]
    async fn test_department_facet_uses_mapping() {
        let provider = MockProvider::default();
        let config = SearchIndexConfig::default().facet_size(25);
        let client = SearchIndexClient::with_config(Box::new(provider.clone()), config);

        let buckets = client
            .department_facet("2706", &IndexMapping::collection())
            .await
            .unwrap();
        assert_eq!(buckets[0].key, "IT");

        client
            .department_facet("employee_index", &IndexMapping::full_employee())
            .await
            .unwrap();

        let queries = provider.queries.lock().await;
        let terms = &queries[0]["aggs"]["department_count"]["terms"];
        assert_eq!(terms["field"], "Department");
        assert_eq!(terms["size"], 25);
        assert_eq!(
            queries[1]["aggs"]["department_count"]["terms"]["field"],
            "Department.keyword"
        );
    }

    #[tokio::test]
    async fn test_health_check() {
        let client = SearchIndexClient::new(Box::new(MockProvider::default()));
        assert!(client.health_check().await.unwrap());

        let provider = MockProvider {
            should_fail: true,
            ..MockProvider::default()
        };
        let client = SearchIndexClient::new(Box::new(provider));
        assert!(!client.health_check().await.unwrap());
    }
}
