//! Error types for the notes repository.

mod search_error;

pub use search_error::SearchError;
