//! Loader module for the employee index ingest.
//!
//! Loads shaped documents into the search index.

use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::errors::IngestError;
use employee_index_repository::{BatchOperationSummary, SearchIndexClient};
use employee_index_shared::EmployeeDocument;

/// Loader that indexes employee documents into the search engine.
///
/// Documents are sent one per request. Failures on individual documents are
/// logged and reported in the summary; the load as a whole only fails when
/// no document made it in.
pub struct EmployeeLoader {
    client: Arc<SearchIndexClient>,
}

impl EmployeeLoader {
    /// Create a new loader with the given client.
    pub fn new(client: Arc<SearchIndexClient>) -> Self {
        Self { client }
    }

    /// Index `documents` into `index`.
    #[instrument(skip(self, documents), fields(document_count = documents.len()))]
    pub async fn load(
        &self,
        index: &str,
        documents: &[EmployeeDocument],
    ) -> Result<BatchOperationSummary, IngestError> {
        let summary = self.client.index_documents(index, documents).await?;

        if summary.total > 0 && summary.succeeded == 0 {
            error!(index = %index, failed = summary.failed, "No documents were indexed");
            return Err(IngestError::loader(format!(
                "All {} documents failed to index into '{}'",
                summary.failed, index
            )));
        }

        if summary.failed > 0 {
            warn!(
                index = %index,
                succeeded = summary.succeeded,
                failed = summary.failed,
                "Some documents failed to index"
            );
        } else {
            info!(index = %index, count = summary.succeeded, "Data indexed successfully");
        }

        Ok(summary)
    }
}
