//! In-memory provider and fixtures for workflow tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use employee_index_ingest::EmployeeCsv;
use employee_index_repository::{IndexMapping, SearchIndexError, SearchIndexProvider};
use employee_index_shared::{EmployeeDocument, FacetBucket, SearchHit, SearchResponse};

const EMPLOYEE_CSV: &str = "\
Employee ID,Full Name,Job Title,Department,Business Unit,Gender,Ethnicity,Age,Hire Date,Annual Salary,Bonus %,Country,City,Exit Date
E02002,Kai Le,Controls Engineer,Engineering,Manufacturing,Male,Asian,47,2/5/2022,\"$92,368\",0%,United States,Columbus,
E02003,Robert Patel,Analyst,Sales,Corporate,Male,Asian,58,10/23/2013,\"$45,703\",0%,United States,Chicago,3/1/2021
E02004,Cameron Lo,Network Administrator,IT,Research & Development,Female,Black,34,3/24/2019,\"$83,576\",0%,China,Shanghai,6/30/2022
E02005,Harper Castillo,IT Systems Architect,IT,Corporate,Female,Latino,39,4/7/2018,\"$98,062\",15%,United States,Seattle,1/15/2023
";

/// Four employees; the first has no exit date.
pub(crate) fn employee_csv() -> EmployeeCsv {
    EmployeeCsv::from_bytes(EMPLOYEE_CSV.as_bytes()).unwrap()
}

/// What `health_check` reports.
#[derive(Clone, Copy, Default)]
pub(crate) enum ClusterHealth {
    #[default]
    Healthy,
    Unhealthy,
    Unreachable,
}

#[derive(Default)]
struct StoredIndex {
    mapping: Option<IndexMapping>,
    documents: Vec<EmployeeDocument>,
}

/// Provider keeping indices in memory.
///
/// `match` queries compare lowercase word tokens, like an analyzed text
/// field with the default OR operator. Terms facets group on the exact
/// field value, ignoring a `.keyword` suffix.
#[derive(Clone, Default)]
pub(crate) struct InMemoryProvider {
    indices: Arc<Mutex<HashMap<String, StoredIndex>>>,
    health: ClusterHealth,
}

impl InMemoryProvider {
    pub(crate) fn with_health(health: ClusterHealth) -> Self {
        Self {
            health,
            ..Default::default()
        }
    }

    pub(crate) async fn documents(&self, index: &str) -> Vec<EmployeeDocument> {
        self.indices
            .lock()
            .await
            .get(index)
            .map(|i| i.documents.clone())
            .unwrap_or_default()
    }

    pub(crate) async fn mapping(&self, index: &str) -> Option<IndexMapping> {
        self.indices
            .lock()
            .await
            .get(index)
            .and_then(|i| i.mapping.clone())
    }
}

fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn matches(document: &EmployeeDocument, query: &Value) -> bool {
    let Some(clause) = query["query"]["match"].as_object() else {
        return false;
    };
    clause.iter().all(|(field, wanted)| {
        let wanted = tokens(&text_of(wanted).unwrap_or_default());
        let have = document
            .get(field)
            .and_then(text_of)
            .map(|t| tokens(&t))
            .unwrap_or_default();
        wanted.iter().any(|t| have.contains(t))
    })
}

#[async_trait]
impl SearchIndexProvider for InMemoryProvider {
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        Ok(self.indices.lock().await.contains_key(index))
    }

    async fn create_index(
        &self,
        index: &str,
        mapping: &IndexMapping,
    ) -> Result<(), SearchIndexError> {
        let mut indices = self.indices.lock().await;
        if indices.contains_key(index) {
            return Err(SearchIndexError::index_creation(format!(
                "resource_already_exists_exception: {}",
                index
            )));
        }
        indices.insert(
            index.to_string(),
            StoredIndex {
                mapping: Some(mapping.clone()),
                documents: Vec::new(),
            },
        );
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
        self.indices
            .lock()
            .await
            .remove(index)
            .map(|_| ())
            .ok_or_else(|| SearchIndexError::index_not_found(index))
    }

    async fn index_document(
        &self,
        index: &str,
        document: &EmployeeDocument,
    ) -> Result<(), SearchIndexError> {
        // Indexing into a missing index creates it, as the engine does.
        self.indices
            .lock()
            .await
            .entry(index.to_string())
            .or_default()
            .documents
            .push(document.clone());
        Ok(())
    }

    async fn search(&self, index: &str, query: &Value) -> Result<SearchResponse, SearchIndexError> {
        let indices = self.indices.lock().await;
        let stored = indices
            .get(index)
            .ok_or_else(|| SearchIndexError::index_not_found(index))?;

        let hits: Vec<SearchHit> = stored
            .documents
            .iter()
            .enumerate()
            .filter(|(_, d)| matches(d, query))
            .map(|(i, d)| SearchHit {
                id: format!("{}-{}", index, i),
                score: Some(1.0),
                source: d.clone(),
            })
            .collect();

        Ok(SearchResponse {
            total: hits.len() as u64,
            hits,
        })
    }

    async fn count(&self, index: &str, query: &Value) -> Result<u64, SearchIndexError> {
        let indices = self.indices.lock().await;
        let stored = indices
            .get(index)
            .ok_or_else(|| SearchIndexError::index_not_found(index))?;

        if query["query"].get("match_all").is_some() {
            return Ok(stored.documents.len() as u64);
        }
        Ok(stored.documents.iter().filter(|d| matches(d, query)).count() as u64)
    }

    async fn delete_by_query(&self, index: &str, query: &Value) -> Result<u64, SearchIndexError> {
        let mut indices = self.indices.lock().await;
        let stored = indices
            .get_mut(index)
            .ok_or_else(|| SearchIndexError::index_not_found(index))?;

        let before = stored.documents.len();
        stored.documents.retain(|d| !matches(d, query));
        Ok((before - stored.documents.len()) as u64)
    }

    async fn terms_facet(
        &self,
        index: &str,
        query: &Value,
        aggregation: &str,
    ) -> Result<Vec<FacetBucket>, SearchIndexError> {
        let indices = self.indices.lock().await;
        let stored = indices
            .get(index)
            .ok_or_else(|| SearchIndexError::index_not_found(index))?;

        let field = query["aggs"][aggregation]["terms"]["field"]
            .as_str()
            .ok_or_else(|| SearchIndexError::query("missing terms field"))?;
        let field = field.strip_suffix(".keyword").unwrap_or(field);

        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for document in &stored.documents {
            if let Some(key) = document.get(field).and_then(text_of) {
                *counts.entry(key).or_default() += 1;
            }
        }

        let mut buckets: Vec<FacetBucket> = counts
            .into_iter()
            .map(|(key, doc_count)| FacetBucket { key, doc_count })
            .collect();
        buckets.sort_by(|a, b| b.doc_count.cmp(&a.doc_count).then(a.key.cmp(&b.key)));
        Ok(buckets)
    }

    async fn refresh(&self, _index: &str) -> Result<(), SearchIndexError> {
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        match self.health {
            ClusterHealth::Healthy => Ok(true),
            ClusterHealth::Unhealthy => Ok(false),
            ClusterHealth::Unreachable => Err(SearchIndexError::connection("connection refused")),
        }
    }
}
