//! # Notes Repository
//!
//! This crate provides the `NoteStore` trait for document operations on the
//! notes collection, the typed engine responses, and a concrete
//! implementation for OpenSearch.

pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use errors::SearchError;
pub use interfaces::NoteStore;
pub use self::opensearch::{IndexConfig, OpenSearchClient};
pub use types::{
    BulkItemError, BulkItemResponse, BulkOperation, BulkResponse, GetResponse, SearchHit,
    SearchResponse, ShardInfo, WriteResponse, WriteResult,
};
