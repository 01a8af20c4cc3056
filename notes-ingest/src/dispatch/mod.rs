//! Asynchronous single-document indexing.
//!
//! The request runs on a spawned task; the caller gets a handle it can await
//! for the outcome, and may attach a callback that fires on completion.

use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::errors::IngestError;
use notes_repository::{NoteStore, SearchError, WriteResponse};
use notes_shared::NoteDocument;

/// Completion handle for an asynchronous index request.
#[derive(Debug)]
pub struct IndexHandle {
    rx: oneshot::Receiver<Result<WriteResponse, SearchError>>,
}

impl IndexHandle {
    /// Wait for the request to complete.
    ///
    /// # Returns
    ///
    /// * `Ok(WriteResponse)` - The engine accepted the document
    /// * `Err(IngestError::SearchError)` - The request failed
    /// * `Err(IngestError::Cancelled)` - The task ended without reporting
    pub async fn wait(self) -> Result<WriteResponse, IngestError> {
        match self.rx.await {
            Ok(result) => result.map_err(IngestError::from),
            Err(_) => Err(IngestError::Cancelled),
        }
    }
}

/// Index a document in the background.
///
/// Must be called from within a tokio runtime.
pub fn index_async(store: Arc<dyn NoteStore>, document: NoteDocument) -> IndexHandle {
    index_async_with(store, document, |_| {})
}

/// Index a document in the background, invoking `on_complete` with the
/// outcome before the handle resolves.
pub fn index_async_with<F>(
    store: Arc<dyn NoteStore>,
    document: NoteDocument,
    on_complete: F,
) -> IndexHandle
where
    F: FnOnce(&Result<WriteResponse, SearchError>) + Send + 'static,
{
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let result = store.index(&document).await;
        match &result {
            Ok(response) => {
                debug!(id = %document.id, result = ?response.result, "Async index completed")
            }
            Err(e) => warn!(id = %document.id, error = %e, "Async index failed"),
        }

        on_complete(&result);

        // The caller may have dropped the handle; nothing to report to then.
        let _ = tx.send(result);
    });

    IndexHandle { rx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use notes_repository::{
        BulkOperation, BulkResponse, GetResponse, SearchResponse, ShardInfo, WriteResult,
    };
    use notes_shared::NoteSource;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Mutex;

    /// Mock store that records indexed documents, or fails every write.
    struct MockStore {
        indexed: Mutex<Vec<NoteDocument>>,
        should_fail: bool,
        should_panic: bool,
    }

    impl MockStore {
        fn new() -> Self {
            Self {
                indexed: Mutex::new(Vec::new()),
                should_fail: false,
                should_panic: false,
            }
        }
    }

    #[async_trait]
    impl NoteStore for MockStore {
        async fn index(&self, document: &NoteDocument) -> Result<WriteResponse, SearchError> {
            if self.should_panic {
                panic!("mock store panicked");
            }
            if self.should_fail {
                return Err(SearchError::index("Mock failure"));
            }
            self.indexed.lock().await.push(document.clone());
            Ok(WriteResponse {
                index: "notes".to_string(),
                id: document.id.clone(),
                version: Some(1),
                result: WriteResult::Created,
                shards: ShardInfo::default(),
                raw: Default::default(),
            })
        }

        async fn get(&self, _id: &str) -> Result<GetResponse, SearchError> {
            unimplemented!()
        }

        async fn get_source(&self, _id: &str) -> Result<NoteSource, SearchError> {
            unimplemented!()
        }

        async fn exists(&self, _id: &str) -> Result<bool, SearchError> {
            unimplemented!()
        }

        async fn delete(&self, _id: &str) -> Result<WriteResponse, SearchError> {
            unimplemented!()
        }

        async fn update(&self, _document: &NoteDocument) -> Result<WriteResponse, SearchError> {
            unimplemented!()
        }

        async fn upsert(&self, _document: &NoteDocument) -> Result<WriteResponse, SearchError> {
            unimplemented!()
        }

        async fn bulk(&self, _operations: &[BulkOperation]) -> Result<BulkResponse, SearchError> {
            unimplemented!()
        }

        async fn search_all(&self) -> Result<SearchResponse, SearchError> {
            unimplemented!()
        }

        async fn ensure_index_exists(&self) -> Result<(), SearchError> {
            Ok(())
        }

        async fn health_check(&self) -> Result<bool, SearchError> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_index_async_completes() {
        let store = Arc::new(MockStore::new());

        let handle = index_async(store.clone(), NoteDocument::new("2", "Hi async!"));
        let response = handle.wait().await.unwrap();

        assert_eq!(response.id, "2");
        assert_eq!(response.result, WriteResult::Created);
        assert_eq!(
            store.indexed.lock().await.clone(),
            vec![NoteDocument::new("2", "Hi async!")]
        );
    }

    #[tokio::test]
    async fn test_callback_runs_before_handle_resolves() {
        let store = Arc::new(MockStore::new());
        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();

        let handle = index_async_with(store, NoteDocument::new("2", "Hi async!"), move |result| {
            assert!(result.is_ok());
            flag.store(true, Ordering::SeqCst);
        });
        handle.wait().await.unwrap();

        assert!(called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_failure_reported_through_handle_and_callback() {
        let store = Arc::new(MockStore {
            should_fail: true,
            ..MockStore::new()
        });
        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();

        let handle = index_async_with(store, NoteDocument::new("2", "Hi async!"), move |result| {
            assert!(result.is_err());
            flag.store(true, Ordering::SeqCst);
        });
        let err = handle.wait().await.unwrap_err();

        assert!(matches!(err, IngestError::SearchError(SearchError::IndexError(_))));
        assert!(called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_panicking_task_is_cancelled() {
        let store = Arc::new(MockStore {
            should_panic: true,
            ..MockStore::new()
        });

        let handle = index_async(store, NoteDocument::new("2", "Hi async!"));
        let err = handle.wait().await.unwrap_err();

        assert!(matches!(err, IngestError::Cancelled));
    }
}
