//! Bulk module for the notes ingest helpers.
//!
//! Accumulates document writes and flushes them to the note store as bulk
//! requests.

mod listener;

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use notes_repository::{BulkItemResponse, BulkOperation, BulkResponse, NoteStore, SearchError};

pub use listener::BulkListener;

/// Item status the engine uses when its write queue is full.
const REJECTED_STATUS: u16 = 429;

/// Configuration for the bulk processor.
///
/// The defaults match the engine client's own bulk processor: flush at 1000
/// actions or 5 MiB, and back off from 50 ms for up to 8 retries.
#[derive(Debug, Clone)]
pub struct BulkProcessorConfig {
    /// Number of queued operations that triggers a flush.
    pub bulk_actions: usize,
    /// Estimated payload size in bytes that triggers a flush.
    pub bulk_size_bytes: usize,
    /// Maximum number of retry attempts for transient failures.
    pub max_retries: u32,
    /// Initial retry delay in milliseconds.
    pub initial_retry_delay_ms: u64,
    /// Maximum retry delay in milliseconds.
    pub max_retry_delay_ms: u64,
}

impl Default for BulkProcessorConfig {
    fn default() -> Self {
        Self {
            bulk_actions: 1000,
            bulk_size_bytes: 5 * 1024 * 1024,
            max_retries: 8,
            initial_retry_delay_ms: 50,
            max_retry_delay_ms: 5000,
        }
    }
}

/// Batching helper that sends queued writes as one bulk request.
///
/// The processor is responsible for:
/// - Queueing operations until a size or count threshold is reached
/// - Retrying whole-request failures that look transient, and items the
///   engine rejected with 429
/// - Reporting every execution to its listener
///
/// A failed batch never fails the caller; the listener is the only place
/// failures surface.
pub struct BulkProcessor {
    store: Arc<dyn NoteStore>,
    listener: Arc<dyn BulkListener>,
    config: BulkProcessorConfig,
    pending: Vec<BulkOperation>,
    pending_bytes: usize,
    next_execution_id: u64,
}

impl BulkProcessor {
    /// Create a new bulk processor with default configuration.
    pub fn new(store: Arc<dyn NoteStore>, listener: Arc<dyn BulkListener>) -> Self {
        Self::with_config(store, listener, BulkProcessorConfig::default())
    }

    /// Create a new bulk processor with custom configuration.
    pub fn with_config(
        store: Arc<dyn NoteStore>,
        listener: Arc<dyn BulkListener>,
        config: BulkProcessorConfig,
    ) -> Self {
        let capacity = config.bulk_actions.min(1024);
        Self {
            store,
            listener,
            config,
            pending: Vec::with_capacity(capacity),
            pending_bytes: 0,
            next_execution_id: 1,
        }
    }

    /// Number of operations waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Queue an operation, flushing if a threshold is reached.
    pub async fn add(&mut self, operation: BulkOperation) {
        self.pending_bytes += operation.estimated_size();
        self.pending.push(operation);

        if self.pending.len() >= self.config.bulk_actions
            || self.pending_bytes >= self.config.bulk_size_bytes
        {
            self.flush().await;
        }
    }

    /// Send every queued operation as one bulk request.
    ///
    /// Does nothing when the queue is empty.
    #[instrument(skip(self), fields(pending = self.pending.len()))]
    pub async fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        let operations: Vec<BulkOperation> = self.pending.drain(..).collect();
        self.pending_bytes = 0;

        let execution_id = self.next_execution_id;
        self.next_execution_id += 1;

        debug!(execution_id, count = operations.len(), "Flushing bulk operations");
        self.listener.before_bulk(execution_id, &operations);

        match self.bulk_with_retry(&operations).await {
            Ok(response) => {
                self.listener.after_bulk(execution_id, &operations, &response);
            }
            Err(e) => {
                warn!(execution_id, error = %e, "Bulk execution failed");
                self.listener.after_bulk_failure(execution_id, &operations, &e);
            }
        }
    }

    /// Flush what is left and release the processor.
    pub async fn close(mut self) {
        self.flush().await;
    }

    /// Send a bulk request with exponential backoff on transient failures.
    ///
    /// A transient failure resends the outstanding operations. Items rejected
    /// with 429 are resent on their own while retries remain; every other
    /// item outcome is final. The returned response lists items in the order
    /// of `operations`.
    async fn bulk_with_retry(
        &self,
        operations: &[BulkOperation],
    ) -> Result<BulkResponse, SearchError> {
        let mut delay_ms = self.config.initial_retry_delay_ms;
        let mut attempt = 0;
        let mut outstanding: Vec<usize> = (0..operations.len()).collect();
        let mut settled: Vec<Option<BulkItemResponse>> = vec![None; operations.len()];
        let mut took = 0;

        loop {
            let batch: Vec<BulkOperation> =
                outstanding.iter().map(|&i| operations[i].clone()).collect();

            match self.store.bulk(&batch).await {
                Ok(response) if attempt == 0 && !Self::has_rejections(&response) => {
                    return Ok(response);
                }
                Ok(response) => {
                    took += response.took;
                    let can_retry = attempt < self.config.max_retries;
                    let mut rejected = Vec::new();
                    for (i, item) in outstanding.iter().copied().zip(response.items) {
                        if can_retry && item.status == REJECTED_STATUS {
                            rejected.push(i);
                        } else {
                            settled[i] = Some(item);
                        }
                    }

                    if rejected.is_empty() {
                        if attempt > 0 {
                            info!(attempt, count = operations.len(), "Bulk succeeded after retry");
                        }
                        let items = settled.into_iter().flatten().collect();
                        return Ok(BulkResponse::new(took, items));
                    }

                    attempt += 1;
                    warn!(
                        attempt,
                        rejected = rejected.len(),
                        delay_ms,
                        "Bulk items rejected, retrying"
                    );
                    outstanding = rejected;
                }
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(
                        attempt,
                        max_retries = self.config.max_retries,
                        delay_ms,
                        error = %e,
                        "Bulk failed, retrying"
                    );
                }
                Err(e) => return Err(e),
            }

            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            delay_ms = std::cmp::min(delay_ms * 2, self.config.max_retry_delay_ms);
        }
    }

    fn has_rejections(response: &BulkResponse) -> bool {
        response
            .items
            .iter()
            .any(|item| item.status == REJECTED_STATUS)
    }
}
