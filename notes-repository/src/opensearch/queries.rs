//! OpenSearch request body builders.
//!
//! This module builds the JSON bodies for update, search and bulk requests.

use opensearch::http::request::JsonBody;
use serde_json::{json, Value};

use crate::errors::SearchError;
use crate::types::BulkOperation;
use notes_shared::NoteDocument;

/// Default number of hits returned by a match-all search.
pub const DEFAULT_SEARCH_SIZE: usize = 10;

/// Build a partial-update body. The update fails if the document is missing.
pub fn build_update_body(document: &NoteDocument) -> Value {
    json!({
        "doc": document.source()
    })
}

/// Build an upsert body: `doc` applies to an existing document, `upsert`
/// is indexed as-is when the document is missing.
pub fn build_upsert_body(document: &NoteDocument) -> Value {
    let source = document.source();
    json!({
        "doc": source,
        "upsert": source
    })
}

/// Build a query matching every document in the collection.
pub fn build_match_all_query(size: usize) -> Value {
    json!({
        "query": {
            "match_all": {}
        },
        "size": size
    })
}

/// Build the NDJSON bulk body for the given operations.
pub fn build_bulk_body(
    index: &str,
    operations: &[BulkOperation],
) -> Result<Vec<JsonBody<Value>>, SearchError> {
    let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(operations.len() * 2);
    for operation in operations {
        for line in operation.to_lines(index)? {
            body.push(line.into());
        }
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_body_has_no_upsert() {
        let body = build_update_body(&NoteDocument::new("2", "Hi updated!"));

        assert_eq!(body["doc"]["text"], "Hi updated!");
        assert!(body.get("upsert").is_none());
    }

    #[test]
    fn test_upsert_body() {
        let body = build_upsert_body(&NoteDocument::new("3", "Hi upserted!"));

        assert_eq!(body["doc"]["text"], "Hi upserted!");
        assert_eq!(body["upsert"]["text"], "Hi upserted!");
    }

    #[test]
    fn test_match_all_query() {
        let query = build_match_all_query(DEFAULT_SEARCH_SIZE);

        assert!(query["query"]["match_all"].is_object());
        assert_eq!(query["size"], 10);
    }

    #[test]
    fn test_bulk_body_line_count() {
        let operations = vec![
            BulkOperation::Index(NoteDocument::new("4", "BulK item!")),
            BulkOperation::Index(NoteDocument::new("5", "Another bulK item!")),
            BulkOperation::Delete("1".to_string()),
        ];

        let body = build_bulk_body("notes", &operations).unwrap();

        assert_eq!(body.len(), 5);
    }
}
