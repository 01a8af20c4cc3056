//! Live tests against a running OpenSearch or Elasticsearch node.
//!
//! Run with `OPENSEARCH_URL=http://localhost:9200 cargo test -- --ignored`.
//! Each test works in its own freshly named collection.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use notes_repository::{
    BulkOperation, IndexConfig, NoteStore, OpenSearchClient, SearchError, WriteResult,
};
use notes_shared::NoteDocument;

async fn live_client(suffix: &str) -> OpenSearchClient {
    let url =
        std::env::var("OPENSEARCH_URL").unwrap_or_else(|_| "http://localhost:9200".to_string());
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let name = format!("notes-it-{}-{}", suffix, nanos);

    let client = OpenSearchClient::new(&url, IndexConfig::new(name))
        .await
        .unwrap();
    client.ensure_index_exists().await.unwrap();
    client
}

#[tokio::test]
#[ignore = "requires a running search node"]
async fn index_then_get_returns_text() {
    let client = live_client("get").await;

    let indexed = client.index(&NoteDocument::new("1", "Hello!")).await.unwrap();
    assert_eq!(indexed.result, WriteResult::Created);

    let fetched = client.get("1").await.unwrap().into_document().unwrap();
    assert_eq!(fetched.text, "Hello!");

    let source = client.get_source("1").await.unwrap();
    assert_eq!(source.text, "Hello!");
}

#[tokio::test]
#[ignore = "requires a running search node"]
async fn delete_then_exists_is_false() {
    let client = live_client("delete").await;

    client.index(&NoteDocument::new("1", "Hello!")).await.unwrap();
    assert!(client.exists("1").await.unwrap());

    let deleted = client.delete("1").await.unwrap();
    assert_eq!(deleted.result, WriteResult::Deleted);
    assert!(!client.exists("1").await.unwrap());

    let again = client.delete("1").await.unwrap();
    assert_eq!(again.result, WriteResult::NotFound);

    let missing = client.get_source("1").await;
    assert!(matches!(missing, Err(SearchError::NotFound(_))));
}

#[tokio::test]
#[ignore = "requires a running search node"]
async fn upsert_twice_keeps_second_text() {
    let client = live_client("upsert").await;

    let first = client
        .upsert(&NoteDocument::new("3", "Hi upserted!"))
        .await
        .unwrap();
    assert_eq!(first.result, WriteResult::Created);

    let second = client
        .upsert(&NoteDocument::new("3", "Hi upserted new!"))
        .await
        .unwrap();
    assert_eq!(second.result, WriteResult::Updated);

    let fetched = client.get("3").await.unwrap().into_document().unwrap();
    assert_eq!(fetched.text, "Hi upserted new!");
}

#[tokio::test]
#[ignore = "requires a running search node"]
async fn update_missing_fails_but_upsert_creates() {
    let client = live_client("update").await;

    let err = client
        .update(&NoteDocument::new("missing", "nope"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    client
        .upsert(&NoteDocument::new("missing", "now here"))
        .await
        .unwrap();
    assert!(client.exists("missing").await.unwrap());
}

#[tokio::test]
#[ignore = "requires a running search node"]
async fn bulk_index_then_search_finds_all() {
    let client = live_client("bulk").await;

    let operations = vec![
        BulkOperation::Index(NoteDocument::new("4", "BulK item!")),
        BulkOperation::Index(NoteDocument::new("5", "Another bulK item!")),
        BulkOperation::Index(NoteDocument::new("6", "One more bulK item!")),
    ];
    let response = client.bulk(&operations).await.unwrap();
    assert!(!response.errors);
    assert_eq!(response.succeeded_ids().len(), 3);

    // wait past the default refresh interval
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let found = client.search_all().await.unwrap();
    let mut ids: Vec<String> = found.documents().into_iter().map(|doc| doc.id).collect();
    ids.sort();
    assert_eq!(ids, vec!["4", "5", "6"]);
}
