//! Callbacks invoked around each bulk execution.

use notes_repository::{BulkOperation, BulkResponse, SearchError};

/// Observer for bulk executions.
///
/// Exactly one of `after_bulk` or `after_bulk_failure` follows every
/// `before_bulk` call with the same `execution_id`.
pub trait BulkListener: Send + Sync {
    /// Called just before a batch is sent.
    fn before_bulk(&self, _execution_id: u64, _operations: &[BulkOperation]) {}

    /// Called when the engine answered the bulk request.
    ///
    /// Individual items may still have failed; see `BulkResponse::failed_ids`.
    fn after_bulk(&self, execution_id: u64, operations: &[BulkOperation], response: &BulkResponse);

    /// Called when the bulk request as a whole failed after any retries.
    fn after_bulk_failure(
        &self,
        execution_id: u64,
        operations: &[BulkOperation],
        error: &SearchError,
    );
}
