//! OpenSearch implementation of the note store.
//!
//! This module provides a concrete implementation of `NoteStore`
//! using OpenSearch (or a wire-compatible Elasticsearch node) as the backend.

mod client;
mod index_config;
mod queries;

pub use client::OpenSearchClient;
pub use index_config::IndexConfig;
