//! Error types for the notes ingest helpers.

use notes_repository::SearchError;
use thiserror::Error;

/// Errors that can occur in the ingest helpers.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Error from the search engine.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchError),

    /// The background task ended without reporting a result.
    #[error("Ingest cancelled")]
    Cancelled,
}
