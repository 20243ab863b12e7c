//! Dependency initialization and wiring for the employee index.

use std::sync::Arc;
use tracing::info;

use crate::config::Settings;
use crate::IndexingError;
use employee_index_ingest::EmployeeLoader;
use employee_index_repository::{
    OpenSearchClient, SearchIndexClient, SearchIndexConfig, SearchIndexProvider,
};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Client used for index management and queries.
    pub client: Arc<SearchIndexClient>,
    /// Loader sharing the same client.
    pub loader: EmployeeLoader,
}

impl Dependencies {
    /// Connect to OpenSearch and verify the cluster is usable.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If the client cannot be built or the cluster is unhealthy
    pub async fn new(settings: &Settings) -> Result<Self, IndexingError> {
        let dependencies = Self::connect(settings)?;
        dependencies.verify_health().await?;
        Ok(dependencies)
    }

    /// Build the OpenSearch client without contacting the cluster.
    pub fn connect(settings: &Settings) -> Result<Self, IndexingError> {
        info!(
            opensearch_url = %settings.opensearch_url,
            timeout_secs = settings.request_timeout.as_secs(),
            "Initializing dependencies"
        );

        let search_client =
            OpenSearchClient::new(&settings.opensearch_url, settings.request_timeout).map_err(
                |e| IndexingError::config(format!("Failed to create OpenSearch client: {}", e)),
            )?;

        Ok(Self::from_provider(
            Box::new(search_client),
            SearchIndexConfig::default(),
        ))
    }

    /// Fail with a configuration error unless the cluster is reachable and
    /// green or yellow.
    pub async fn verify_health(&self) -> Result<(), IndexingError> {
        let healthy = self
            .client
            .health_check()
            .await
            .map_err(|e| IndexingError::config(format!("OpenSearch health check failed: {}", e)))?;

        if !healthy {
            return Err(IndexingError::config("OpenSearch cluster is unhealthy"));
        }

        info!("OpenSearch connection verified");
        Ok(())
    }

    /// Wire dependencies around an already built provider.
    pub fn from_provider(provider: Box<dyn SearchIndexProvider>, config: SearchIndexConfig) -> Self {
        let client = Arc::new(SearchIndexClient::with_config(provider, config));
        let loader = EmployeeLoader::new(Arc::clone(&client));
        Self { client, loader }
    }
}
