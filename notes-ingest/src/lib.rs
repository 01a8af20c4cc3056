//! # Notes Ingest
//!
//! Write-side helpers layered on top of a `NoteStore`:
//!
//! 1. **Bulk**: a batching processor that accumulates writes and flushes
//!    them as one bulk request, reporting outcomes to a listener
//! 2. **Dispatch**: fire-and-wait async indexing with completion callbacks

pub mod bulk;
pub mod dispatch;
pub mod errors;

pub use bulk::{BulkListener, BulkProcessor, BulkProcessorConfig};
pub use dispatch::{index_async, index_async_with, IndexHandle};
pub use errors::IngestError;
