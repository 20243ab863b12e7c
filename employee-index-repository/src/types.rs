//! Request and response types for search index operations.

use crate::errors::SearchIndexError;

/// Result of indexing a single document within a batch.
#[derive(Debug, Clone)]
pub struct BatchOperationResult {
    /// Position of the document in the input batch.
    pub position: usize,
    /// Employee ID of the document, when it carries one.
    pub employee_id: Option<String>,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error if the operation failed.
    pub error: Option<SearchIndexError>,
}

/// Summary of a batch operation containing aggregate statistics and individual results.
///
/// Documents are sent one at a time, so a failure on one does not stop the
/// rest. Callers decide what a partial failure means for them.
#[derive(Debug, Clone, Default)]
pub struct BatchOperationSummary {
    /// Total number of items in the batch.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results for each item.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// Record the outcome of one item.
    pub fn record(
        &mut self,
        position: usize,
        employee_id: Option<String>,
        outcome: Result<(), SearchIndexError>,
    ) {
        self.total += 1;
        match outcome {
            Ok(()) => {
                self.succeeded += 1;
                self.results.push(BatchOperationResult {
                    position,
                    employee_id,
                    success: true,
                    error: None,
                });
            }
            Err(e) => {
                self.failed += 1;
                self.results.push(BatchOperationResult {
                    position,
                    employee_id,
                    success: false,
                    error: Some(e),
                });
            }
        }
    }

    /// Results of the items that failed.
    pub fn failures(&self) -> impl Iterator<Item = &BatchOperationResult> {
        self.results.iter().filter(|r| !r.success)
    }
}

/// Outcome of ensuring an index exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    /// The index was created by this call.
    Created,
    /// The index was already there and was left untouched.
    AlreadyExists,
}

/// Outcome of deleting an employee by ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// This many documents matched and were deleted.
    Deleted(u64),
    /// No document matched, or the index does not exist.
    NotFound,
}
