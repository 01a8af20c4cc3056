//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `NoteStore`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    BulkParts, DeleteParts, ExistsParts, GetParts, GetSourceParts, IndexParts, OpenSearch,
    SearchParts, UpdateParts,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::errors::SearchError;
use crate::interfaces::NoteStore;
use crate::opensearch::index_config::IndexConfig;
use crate::opensearch::queries::{
    build_bulk_body, build_match_all_query, build_update_body, build_upsert_body,
    DEFAULT_SEARCH_SIZE,
};
use crate::types::{BulkOperation, BulkResponse, GetResponse, SearchResponse, WriteResponse};
use notes_shared::{NoteDocument, NoteSource};

/// OpenSearch client implementation.
///
/// Holds one connection handle to a single node and the collection it
/// operates on.
///
/// # Example
///
/// ```ignore
/// use notes_repository::{IndexConfig, NoteStore, OpenSearchClient};
/// use notes_shared::NoteDocument;
///
/// let client = OpenSearchClient::new("http://localhost:9200", IndexConfig::default()).await?;
/// client.index(&NoteDocument::new("1", "Hello!")).await?;
/// let response = client.get("1").await?;
/// println!("GET RESPONSE: {}", response);
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
    index_config: IndexConfig,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `index_config` - The collection name and creation settings
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchError)` - If the URL is invalid or transport setup fails
    pub async fn new(url: &str, index_config: IndexConfig) -> Result<Self, SearchError> {
        let parsed_url = Url::parse(url).map_err(|e| SearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            index = %index_config.name,
            "Created OpenSearch client"
        );

        Ok(Self {
            client,
            index_config,
        })
    }

    /// The collection this client operates on.
    pub fn index_name(&self) -> &str {
        &self.index_config.name
    }

    /// Read a successful response body as JSON.
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, SearchError> {
        response
            .json::<T>()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))
    }

    /// Turn a non-success response into a `SearchError::Status`.
    async fn status_error(response: Response) -> SearchError {
        let status = response.status_code().as_u16();
        let body = response.text().await.unwrap_or_default();
        SearchError::status(status, body)
    }

    /// Extract the engine's error type from an error response body, if any.
    fn error_type(body: &str) -> Option<String> {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| value["error"]["type"].as_str().map(str::to_string))
    }
}

#[async_trait]
impl NoteStore for OpenSearchClient {
    #[instrument(skip(self, document), fields(id = %document.id))]
    async fn index(&self, document: &NoteDocument) -> Result<WriteResponse, SearchError> {
        let response = self
            .client
            .index(IndexParts::IndexId(self.index_name(), &document.id))
            .body(document.source())
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            let err = Self::status_error(response).await;
            error!(error = %err, "Index request failed");
            return Err(SearchError::index(err.to_string()));
        }

        let result = WriteResponse::from_value(Self::read_json(response).await?)?;
        debug!(result = ?result.result, version = ?result.version, "Document indexed");
        Ok(result)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> Result<GetResponse, SearchError> {
        let response = self
            .client
            .get(GetParts::IndexId(self.index_name(), id))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let status = response.status_code();

        // 404 carries a `found: false` body unless the collection itself is missing
        if status.is_success() || status.as_u16() == 404 {
            let body: Value = Self::read_json(response).await?;
            if body.get("found").is_some() {
                return GetResponse::from_value(body);
            }
            return Err(SearchError::get(body.to_string()));
        }

        let err = Self::status_error(response).await;
        error!(error = %err, "Get request failed");
        Err(SearchError::get(err.to_string()))
    }

    #[instrument(skip(self))]
    async fn get_source(&self, id: &str) -> Result<NoteSource, SearchError> {
        let response = self
            .client
            .get_source(GetSourceParts::IndexId(self.index_name(), id))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            return Err(SearchError::not_found(self.index_name(), id));
        }
        if !status.is_success() {
            let err = Self::status_error(response).await;
            error!(error = %err, "Get source request failed");
            return Err(SearchError::get(err.to_string()));
        }

        Self::read_json(response).await
    }

    #[instrument(skip(self))]
    async fn exists(&self, id: &str) -> Result<bool, SearchError> {
        let response = self
            .client
            .exists(ExistsParts::IndexId(self.index_name(), id))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            _ => Err(Self::status_error(response).await),
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<WriteResponse, SearchError> {
        let response = self
            .client
            .delete(DeleteParts::IndexId(self.index_name(), id))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let status = response.status_code();

        // 404 is acceptable - the body reports `result: not_found`
        if status.is_success() || status.as_u16() == 404 {
            let result = WriteResponse::from_value(Self::read_json(response).await?)?;
            debug!(result = ?result.result, "Document deleted");
            return Ok(result);
        }

        let err = Self::status_error(response).await;
        error!(error = %err, "Delete request failed");
        Err(SearchError::delete(err.to_string()))
    }

    #[instrument(skip(self, document), fields(id = %document.id))]
    async fn update(&self, document: &NoteDocument) -> Result<WriteResponse, SearchError> {
        let response = self
            .client
            .update(UpdateParts::IndexId(self.index_name(), &document.id))
            .body(build_update_body(document))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let err = Self::status_error(response).await;
            if let SearchError::Status { status: 404, body } = &err {
                if Self::error_type(body).as_deref() == Some("document_missing_exception") {
                    warn!("Update target does not exist");
                    return Err(SearchError::not_found(self.index_name(), &document.id));
                }
            }
            error!(error = %err, "Update request failed");
            return Err(SearchError::update(err.to_string()));
        }

        WriteResponse::from_value(Self::read_json(response).await?)
    }

    // API reference: https://docs.opensearch.org/latest/api-reference/document-apis/update-document/#using-the-upsert-operation
    #[instrument(skip(self, document), fields(id = %document.id))]
    async fn upsert(&self, document: &NoteDocument) -> Result<WriteResponse, SearchError> {
        let response = self
            .client
            .update(UpdateParts::IndexId(self.index_name(), &document.id))
            .body(build_upsert_body(document))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            let err = Self::status_error(response).await;
            error!(error = %err, "Upsert request failed");
            return Err(SearchError::update(err.to_string()));
        }

        let result = WriteResponse::from_value(Self::read_json(response).await?)?;
        debug!(result = ?result.result, "Document upserted");
        Ok(result)
    }

    #[instrument(skip(self, operations), fields(count = operations.len()))]
    async fn bulk(&self, operations: &[BulkOperation]) -> Result<BulkResponse, SearchError> {
        let body = build_bulk_body(self.index_name(), operations)?;

        let response = self
            .client
            .bulk(BulkParts::Index(self.index_name()))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let err = Self::status_error(response).await;
            error!(error = %err, "Bulk request failed");
            // keep the status so callers can tell back-pressure from bad input
            return Err(err);
        }

        let body: Value = Self::read_json(response).await?;
        let result = BulkResponse::from_value(body)?;

        if result.errors {
            warn!(
                failed = result.failed_ids().len(),
                total = result.items.len(),
                "Bulk request had item failures"
            );
        } else {
            debug!(total = result.items.len(), took = result.took, "Bulk request completed");
        }

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn search_all(&self) -> Result<SearchResponse, SearchError> {
        let response = self
            .client
            .search(SearchParts::Index(&[self.index_name()]))
            .body(build_match_all_query(DEFAULT_SEARCH_SIZE))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            let err = Self::status_error(response).await;
            error!(error = %err, "Search request failed");
            return Err(SearchError::query(err.to_string()));
        }

        let body: Value = Self::read_json(response).await?;
        let result = SearchResponse::from_value(body)?;
        debug!(total = result.total, took = result.took, "Search completed");
        Ok(result)
    }

    #[instrument(skip(self))]
    async fn ensure_index_exists(&self) -> Result<(), SearchError> {
        let exists = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[self.index_name()]))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        if exists.status_code().is_success() {
            debug!(index = %self.index_name(), "Index already exists");
            return Ok(());
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(self.index_name()))
            .body(self.index_config.index_settings())
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            let err = Self::status_error(response).await;
            if let SearchError::Status { body, .. } = &err {
                // Another client created it between the check and the create
                if Self::error_type(body).as_deref() == Some("resource_already_exists_exception")
                {
                    return Ok(());
                }
            }
            error!(error = %err, "Index creation failed");
            return Err(SearchError::IndexCreationError(err.to_string()));
        }

        info!(index = %self.index_name(), "Created index");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, SearchError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            return Ok(false);
        }

        let body: Value = Self::read_json(response).await?;
        let status = body["status"].as_str().unwrap_or("red");

        debug!(status = %status, "Cluster health");
        Ok(status != "red")
    }
}
