//! Note store trait definition.
//!
//! This module defines the abstract interface for document operations on the
//! notes collection, allowing for different backend implementations
//! (OpenSearch, Elasticsearch, in-memory mocks).

use async_trait::async_trait;

use crate::errors::SearchError;
use crate::types::{BulkOperation, BulkResponse, GetResponse, SearchResponse, WriteResponse};
use notes_shared::{NoteDocument, NoteSource};

/// Abstract interface for document operations on a single collection.
///
/// Each method maps one-to-one onto one of the engine's REST document
/// endpoints. Implementations add no retries, caching or validation.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, SearchError>`. Missing documents are
/// reported as data where the engine does so (`get`, `exists`, `delete`) and
/// as `SearchError::NotFound` where the engine fails the request
/// (`get_source`, `update`).
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Index a document, replacing any existing document with the same id.
    async fn index(&self, document: &NoteDocument) -> Result<WriteResponse, SearchError>;

    /// Fetch a document by id.
    ///
    /// # Returns
    ///
    /// * `Ok(GetResponse)` - With `found == false` if the document is absent
    /// * `Err(SearchError)` - If the request fails
    async fn get(&self, id: &str) -> Result<GetResponse, SearchError>;

    /// Fetch only the stored source of a document.
    ///
    /// # Returns
    ///
    /// * `Ok(NoteSource)` - The stored body
    /// * `Err(SearchError::NotFound)` - If the document is absent
    async fn get_source(&self, id: &str) -> Result<NoteSource, SearchError>;

    /// Check whether a document exists.
    async fn exists(&self, id: &str) -> Result<bool, SearchError>;

    /// Delete a document.
    ///
    /// Deleting a missing document succeeds with `WriteResult::NotFound`.
    async fn delete(&self, id: &str) -> Result<WriteResponse, SearchError>;

    /// Partially update an existing document.
    ///
    /// # Returns
    ///
    /// * `Ok(WriteResponse)` - If the document was updated
    /// * `Err(SearchError::NotFound)` - If the document doesn't exist
    async fn update(&self, document: &NoteDocument) -> Result<WriteResponse, SearchError>;

    /// Update a document if present, insert it otherwise, in one request.
    async fn upsert(&self, document: &NoteDocument) -> Result<WriteResponse, SearchError>;

    /// Submit several writes as one bulk request.
    ///
    /// Item-level failures are reported inside the returned `BulkResponse`;
    /// only a failure of the request as a whole is an `Err`.
    async fn bulk(&self, operations: &[BulkOperation]) -> Result<BulkResponse, SearchError>;

    /// Return the collection's documents using a match-all query.
    async fn search_all(&self) -> Result<SearchResponse, SearchError>;

    /// Ensure the collection exists with the note mapping.
    ///
    /// This should be called during application startup.
    async fn ensure_index_exists(&self) -> Result<(), SearchError>;

    /// Check if the search engine is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the cluster status is green or yellow
    /// * `Ok(false)` - If the cluster status is red
    /// * `Err(SearchError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchError>;
}
