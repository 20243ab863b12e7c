//! Collection tasks workflow.
//!
//! Cleans the CSV, loads it into two collections with a different column
//! left out of each, deletes one employee and reports counts, searches and
//! department facets.

use tracing::{info, instrument};

use crate::config::Dependencies;
use crate::IndexingError;
use employee_index_ingest::{DocumentShaper, EmployeeCsv, ShapeOptions};
use employee_index_repository::{BatchOperationSummary, DeleteOutcome, IndexMapping};
use employee_index_shared::{fields, FacetBucket, SearchHit};

/// Parameters of the collection tasks.
#[derive(Debug, Clone)]
pub struct CollectionTasks {
    pub name_collection: String,
    pub phone_collection: String,
    /// Column left out of the name collection.
    pub name_exclude: String,
    /// Column left out of the phone collection.
    pub phone_exclude: String,
    /// Employee removed from the name collection.
    pub delete_employee_id: String,
    pub shape_options: ShapeOptions,
}

impl CollectionTasks {
    pub fn new(name_collection: impl Into<String>, phone_collection: impl Into<String>) -> Self {
        Self {
            name_collection: name_collection.into(),
            phone_collection: phone_collection.into(),
            name_exclude: fields::DEPARTMENT.to_string(),
            phone_exclude: fields::GENDER.to_string(),
            delete_employee_id: "E02003".to_string(),
            shape_options: ShapeOptions::default(),
        }
    }

    pub fn with_shape_options(mut self, shape_options: ShapeOptions) -> Self {
        self.shape_options = shape_options;
        self
    }
}

/// Hits of one column search.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub index: String,
    pub column: String,
    pub value: String,
    pub hits: Vec<SearchHit>,
}

/// Department buckets of one collection.
#[derive(Debug, Clone)]
pub struct FacetReport {
    pub index: String,
    pub buckets: Vec<FacetBucket>,
}

/// What the collection tasks did.
#[derive(Debug)]
pub struct CollectionReport {
    pub id_column: String,
    pub dropped_rows: usize,
    /// Name collection count before loading.
    pub initial_count: u64,
    pub name_indexed: BatchOperationSummary,
    pub phone_indexed: BatchOperationSummary,
    pub deletion: DeleteOutcome,
    /// Name collection count after the deletion.
    pub updated_count: u64,
    pub searches: Vec<SearchReport>,
    pub facets: Vec<FacetReport>,
}

async fn search(
    deps: &Dependencies,
    index: &str,
    column: &str,
    value: &str,
) -> Result<SearchReport, IndexingError> {
    let hits = deps.client.search_by_column(index, column, value).await?;
    info!(index = %index, column = %column, value = %value, hits = hits.len(), "Search completed");
    Ok(SearchReport {
        index: index.to_string(),
        column: column.to_string(),
        value: value.to_string(),
        hits,
    })
}

/// Run the collection tasks against both collections.
#[instrument(skip_all, fields(name = %tasks.name_collection, phone = %tasks.phone_collection))]
pub async fn run_collection_tasks(
    deps: &Dependencies,
    csv: &EmployeeCsv,
    tasks: &CollectionTasks,
) -> Result<CollectionReport, IndexingError> {
    let shaper = DocumentShaper::new(tasks.shape_options.clone());
    let table = shaper.clean(csv)?;
    let name_documents = shaper.shape_all(&table, Some(&tasks.name_exclude))?;
    let phone_documents = shaper.shape_all(&table, Some(&tasks.phone_exclude))?;

    let mapping = IndexMapping::collection();
    for collection in [&tasks.name_collection, &tasks.phone_collection] {
        deps.client.ensure_index(collection, &mapping).await?;
    }

    let initial_count = deps.client.employee_count(&tasks.name_collection).await?;
    info!(index = %tasks.name_collection, count = initial_count, "Employee count");

    let name_indexed = deps
        .loader
        .load(&tasks.name_collection, &name_documents)
        .await?;
    let phone_indexed = deps
        .loader
        .load(&tasks.phone_collection, &phone_documents)
        .await?;

    let deletion = deps
        .client
        .delete_employee_by_id(
            &tasks.name_collection,
            &table.id_column,
            &tasks.delete_employee_id,
        )
        .await?;

    let updated_count = deps.client.employee_count(&tasks.name_collection).await?;
    info!(index = %tasks.name_collection, count = updated_count, "Updated employee count");

    let searches = vec![
        search(deps, &tasks.name_collection, fields::DEPARTMENT, "IT").await?,
        search(deps, &tasks.name_collection, fields::GENDER, "Male").await?,
        search(deps, &tasks.phone_collection, fields::DEPARTMENT, "IT").await?,
    ];

    let mut facets = Vec::with_capacity(2);
    for collection in [&tasks.name_collection, &tasks.phone_collection] {
        let buckets = deps.client.department_facet(collection, &mapping).await?;
        facets.push(FacetReport {
            index: collection.clone(),
            buckets,
        });
    }

    Ok(CollectionReport {
        id_column: table.id_column,
        dropped_rows: table.dropped,
        initial_count,
        name_indexed,
        phone_indexed,
        deletion,
        updated_count,
        searches,
        facets,
    })
}
