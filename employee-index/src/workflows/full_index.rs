//! Full index workflow.
//!
//! Rebuilds the fully mapped employee index from the CSV file and runs one
//! sample match query against it.

use tracing::{info, instrument};

use crate::config::Dependencies;
use crate::IndexingError;
use employee_index_ingest::{DocumentShaper, EmployeeCsv};
use employee_index_repository::{BatchOperationSummary, IndexMapping};
use employee_index_shared::{fields, EmployeeDocument, SearchHit};

/// Parameters of a full index run.
#[derive(Debug, Clone)]
pub struct FullIndexOptions {
    pub index: String,
    /// Field of the sample query.
    pub query_field: String,
    /// Value matched against `query_field`.
    pub query_value: String,
}

impl FullIndexOptions {
    /// Options with the default sample query, `Ethnicity: Asian`.
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            query_field: fields::ETHNICITY.to_string(),
            query_value: "Asian".to_string(),
        }
    }
}

/// What a full index run did.
#[derive(Debug)]
pub struct FullIndexReport {
    pub summary: BatchOperationSummary,
    pub hits: Vec<SearchHit>,
}

/// Drop and recreate the index, load every record, then run the sample query.
///
/// The records are read and shaped before the index is touched, so a file
/// with missing columns or bad dates leaves the existing index in place.
#[instrument(skip_all, fields(index = %options.index))]
pub async fn run_full_index(
    deps: &Dependencies,
    csv: &EmployeeCsv,
    options: &FullIndexOptions,
) -> Result<FullIndexReport, IndexingError> {
    let shaper = DocumentShaper::default();
    let documents = csv
        .records()?
        .iter()
        .map(|record| shaper.shape_record(record))
        .collect::<Result<Vec<EmployeeDocument>, _>>()?;

    deps.client
        .recreate_index(&options.index, &IndexMapping::full_employee())
        .await?;

    let summary = deps.loader.load(&options.index, &documents).await?;

    let hits = deps
        .client
        .search_by_column(&options.index, &options.query_field, &options.query_value)
        .await?;
    info!(
        field = %options.query_field,
        value = %options.query_value,
        hits = hits.len(),
        "Sample query completed"
    );

    Ok(FullIndexReport { summary, hits })
}
