//! Bulk listener that prints each execution to stdout.

use notes_ingest::BulkListener;
use notes_repository::{BulkOperation, BulkResponse, SearchError};
use tracing::warn;

fn ids(operations: &[BulkOperation]) -> Vec<&str> {
    operations.iter().map(BulkOperation::id).collect()
}

fn before_line(execution_id: u64, operations: &[BulkOperation]) -> String {
    format!(
        "BEFORE BULK: #{} {} requests {:?}",
        execution_id,
        operations.len(),
        ids(operations)
    )
}

fn outcome_lines(response: &BulkResponse) -> [String; 2] {
    [
        format!("BULK SUCCEEDED: {:?}", response.succeeded_ids()),
        format!("BULK FAILED: {:?}", response.failed_ids()),
    ]
}

fn failure_line(operations: &[BulkOperation], error: &SearchError) -> String {
    format!("BULK FAILED {}: {:?}", error, ids(operations))
}

/// Prints `BEFORE BULK`, `BULK SUCCEEDED`, and `BULK FAILED` lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleBulkListener;

impl BulkListener for ConsoleBulkListener {
    fn before_bulk(&self, execution_id: u64, operations: &[BulkOperation]) {
        println!("{}", before_line(execution_id, operations));
    }

    fn after_bulk(
        &self,
        _execution_id: u64,
        _operations: &[BulkOperation],
        response: &BulkResponse,
    ) {
        for line in outcome_lines(response) {
            println!("{}", line);
        }

        for item in response.items.iter().filter(|item| item.is_failed()) {
            if let Some(error) = &item.error {
                warn!(id = %item.id, status = item.status, error = %error, "Bulk item failed");
            }
        }
    }

    fn after_bulk_failure(
        &self,
        _execution_id: u64,
        operations: &[BulkOperation],
        error: &SearchError,
    ) {
        println!("{}", failure_line(operations, error));
    }
}
