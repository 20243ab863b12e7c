//! Configuration types for the SearchIndexClient.

/// Default number of buckets returned by a terms facet.
///
/// Same as the search engine's own default for terms aggregations.
pub const DEFAULT_FACET_SIZE: usize = 10;

/// Configuration for the SearchIndexClient.
#[derive(Debug, Clone)]
pub struct SearchIndexConfig {
    /// Number of buckets requested from terms aggregations.
    pub facet_size: usize,
    /// Refresh the index after writes so counts and searches see them at once.
    pub refresh_after_write: bool,
    /// Maximum number of documents accepted by a single `index_documents` call.
    /// Set to None to disable the limit.
    pub max_batch_size: Option<usize>,
}

impl Default for SearchIndexConfig {
    fn default() -> Self {
        Self {
            facet_size: DEFAULT_FACET_SIZE,
            refresh_after_write: true,
            max_batch_size: None,
        }
    }
}

impl SearchIndexConfig {
    /// Create a config with a custom batch size limit.
    pub fn with_max_batch_size(max_batch_size: usize) -> Self {
        Self {
            max_batch_size: Some(max_batch_size),
            ..Self::default()
        }
    }

    /// Set the number of facet buckets.
    pub fn facet_size(mut self, facet_size: usize) -> Self {
        self.facet_size = facet_size;
        self
    }

    /// Leave write visibility to the engine's refresh interval.
    pub fn without_refresh(mut self) -> Self {
        self.refresh_after_write = false;
        self
    }
}
