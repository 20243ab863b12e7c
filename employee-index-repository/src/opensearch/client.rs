//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust client.

use std::time::Duration;

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesRefreshParts},
    CountParts, DeleteByQueryParts, IndexParts, OpenSearch, SearchParts,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::index_config::IndexMapping;
use employee_index_shared::{EmployeeDocument, FacetBucket, SearchHit, SearchResponse};

/// OpenSearch client implementation.
///
/// Talks to a single node over HTTP. Every request shares the timeout given
/// at construction.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use employee_index_repository::opensearch::{IndexMapping, OpenSearchClient};
///
/// let client = OpenSearchClient::new("http://localhost:9200", Duration::from_secs(60))?;
/// client.create_index("employee_index", &IndexMapping::full_employee()).await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `timeout` - Request timeout applied to every call
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchIndexError)` - If the URL is invalid or transport setup fails
    pub fn new(url: &str, timeout: Duration) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            timeout_secs = timeout.as_secs(),
            "Created OpenSearch client"
        );

        Ok(Self { client })
    }

    /// Parse a single search hit.
    ///
    /// Returns `None` when the hit has no `_id` or no `_source` object.
    fn parse_hit(hit: &Value) -> Option<SearchHit> {
        let id = hit.get("_id")?.as_str()?.to_string();
        let source = hit.get("_source")?.as_object()?.clone();
        let score = hit.get("_score").and_then(Value::as_f64);

        Some(SearchHit {
            id,
            score,
            source: EmployeeDocument::from(source),
        })
    }

    /// Read `hits.total`, which is an object on current engines and a bare
    /// number on older ones.
    fn parse_total(hits: &Value) -> u64 {
        match hits.get("total") {
            Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
            Some(total) => total.get("value").and_then(Value::as_u64).unwrap_or(0),
            None => 0,
        }
    }

    /// Parse a search response body into hits.
    fn parse_search_response(body: &Value) -> Result<SearchResponse, SearchIndexError> {
        let hits = body
            .get("hits")
            .ok_or_else(|| SearchIndexError::parse("Search response has no hits"))?;
        let raw_hits = hits
            .get("hits")
            .and_then(Value::as_array)
            .ok_or_else(|| SearchIndexError::parse("Search response hits is not an array"))?;

        let mut parsed = Vec::with_capacity(raw_hits.len());
        for hit in raw_hits {
            match Self::parse_hit(hit) {
                Some(h) => parsed.push(h),
                None => warn!(hit = %hit, "Skipping malformed search hit"),
            }
        }

        Ok(SearchResponse {
            total: Self::parse_total(hits),
            hits: parsed,
        })
    }

    /// Parse the buckets of a terms aggregation.
    ///
    /// Numeric keys are rendered as strings so every bucket has the same shape.
    fn parse_buckets(body: &Value, aggregation: &str) -> Result<Vec<FacetBucket>, SearchIndexError> {
        let buckets = body
            .get("aggregations")
            .and_then(|a| a.get(aggregation))
            .and_then(|a| a.get("buckets"))
            .and_then(Value::as_array)
            .ok_or_else(|| {
                SearchIndexError::parse(format!("Aggregation '{}' has no buckets", aggregation))
            })?;

        buckets
            .iter()
            .map(|bucket| {
                let key = match bucket.get("key") {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => return Err(SearchIndexError::parse("Bucket has no key")),
                };
                let doc_count = bucket
                    .get("doc_count")
                    .and_then(Value::as_u64)
                    .ok_or_else(|| SearchIndexError::parse("Bucket has no doc_count"))?;
                Ok(FacetBucket { key, doc_count })
            })
            .collect()
    }

    /// Read a top-level unsigned counter such as `count` or `deleted`.
    fn parse_counter(body: &Value, name: &str) -> Result<u64, SearchIndexError> {
        body.get(name)
            .and_then(Value::as_u64)
            .ok_or_else(|| SearchIndexError::parse(format!("Response has no '{}' field", name)))
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchClient {
    #[instrument(skip(self))]
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(SearchIndexError::query(format!(
                "Index exists check failed with status {}",
                status
            ))),
        }
    }

    /// Create an index, sending the mapping body as-is.
    ///
    /// The engine answers 400 when the index already exists; that is reported
    /// as an `IndexCreationError` like any other rejection.
    #[instrument(skip(self, mapping))]
    async fn create_index(
        &self,
        index: &str,
        mapping: &IndexMapping,
    ) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(mapping.body().clone())
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Create index request failed");
            return Err(SearchIndexError::index_creation(format!(
                "Create index failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(index = %index, "Index created");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::delete(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            return Err(SearchIndexError::index_not_found(index));
        }
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Delete index request failed");
            return Err(SearchIndexError::delete(format!(
                "Delete index failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(index = %index, "Index deleted");
        Ok(())
    }

    async fn index_document(
        &self,
        index: &str,
        document: &EmployeeDocument,
    ) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .index(IndexParts::Index(index))
            .body(document.clone().into_value())
            .send()
            .await
            .map_err(|e| SearchIndexError::index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index request failed");
            return Err(SearchIndexError::index(format!(
                "Index failed with status {}: {}",
                status, error_body
            )));
        }

        Ok(())
    }

    #[instrument(skip(self, query))]
    async fn search(&self, index: &str, query: &Value) -> Result<SearchResponse, SearchIndexError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(query.clone())
            .send()
            .await
            .map_err(|e| SearchIndexError::query(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            return Err(SearchIndexError::index_not_found(index));
        }
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Search request failed");
            return Err(SearchIndexError::query(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let result = Self::parse_search_response(&body)?;
        debug!(total = result.total, returned = result.hits.len(), "Search completed");
        Ok(result)
    }

    #[instrument(skip(self, query))]
    async fn count(&self, index: &str, query: &Value) -> Result<u64, SearchIndexError> {
        let response = self
            .client
            .count(CountParts::Index(&[index]))
            .body(query.clone())
            .send()
            .await
            .map_err(|e| SearchIndexError::query(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            return Err(SearchIndexError::index_not_found(index));
        }
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Count request failed");
            return Err(SearchIndexError::query(format!(
                "Count failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        Self::parse_counter(&body, "count")
    }

    #[instrument(skip(self, query))]
    async fn delete_by_query(&self, index: &str, query: &Value) -> Result<u64, SearchIndexError> {
        let response = self
            .client
            .delete_by_query(DeleteByQueryParts::Index(&[index]))
            .body(query.clone())
            .send()
            .await
            .map_err(|e| SearchIndexError::delete(e.to_string()))?;

        let status = response.status_code();

        // 404 means the index itself is missing
        if status.as_u16() == 404 {
            return Err(SearchIndexError::index_not_found(index));
        }
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Delete by query request failed");
            return Err(SearchIndexError::delete(format!(
                "Delete by query failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let deleted = Self::parse_counter(&body, "deleted")?;
        debug!(index = %index, deleted = deleted, "Delete by query completed");
        Ok(deleted)
    }

    #[instrument(skip(self, query))]
    async fn terms_facet(
        &self,
        index: &str,
        query: &Value,
        aggregation: &str,
    ) -> Result<Vec<FacetBucket>, SearchIndexError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(query.clone())
            .send()
            .await
            .map_err(|e| SearchIndexError::query(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            return Err(SearchIndexError::index_not_found(index));
        }
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Aggregation request failed");
            return Err(SearchIndexError::query(format!(
                "Aggregation failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        Self::parse_buckets(&body, aggregation)
    }

    async fn refresh(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::query(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            return Err(SearchIndexError::index_not_found(index));
        }
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SearchIndexError::query(format!(
                "Refresh failed with status {}: {}",
                status, error_body
            )));
        }

        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let health: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;
        let status = health
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown");

        info!(status = %status, "OpenSearch cluster status");

        Ok(status == "green" || status == "yellow")
    }
}
