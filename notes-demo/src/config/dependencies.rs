//! Dependency initialization and wiring for the notes demo.

use std::sync::Arc;
use tracing::info;

use crate::config::DemoConfig;
use crate::DemoError;
use notes_repository::{IndexConfig, NoteStore, OpenSearchClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The connected note store.
    pub store: Arc<dyn NoteStore>,
}

impl Dependencies {
    /// Connect to the search engine and prepare the collection.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(DemoError)` - If the engine is unreachable or unhealthy
    pub async fn new(config: &DemoConfig) -> Result<Self, DemoError> {
        info!(
            opensearch_url = %config.opensearch_url,
            index = %config.index_name,
            "Initializing dependencies"
        );

        let client =
            OpenSearchClient::new(&config.opensearch_url, IndexConfig::new(&config.index_name))
                .await
                .map_err(|e| {
                    DemoError::config(format!("Failed to create OpenSearch client: {}", e))
                })?;

        // Verify OpenSearch is reachable
        let healthy = client
            .health_check()
            .await
            .map_err(|e| DemoError::config(format!("OpenSearch health check failed: {}", e)))?;

        if !healthy {
            return Err(DemoError::config("OpenSearch cluster is unhealthy"));
        }

        info!("OpenSearch connection verified");

        client.ensure_index_exists().await?;

        Ok(Self {
            store: Arc::new(client),
        })
    }
}
