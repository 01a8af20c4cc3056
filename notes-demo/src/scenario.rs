//! The fixed demo sequence.
//!
//! Every step issues one request against the note store and prints the raw
//! response. Synchronous failures abort the run; the async index and the bulk
//! batch report their failures and let the run continue.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::console::ConsoleBulkListener;
use crate::DemoError;
use notes_ingest::{index_async_with, BulkProcessor};
use notes_repository::{BulkOperation, NoteStore};
use notes_shared::{NoteDocument, NoteSource};

/// Documents written through the bulk processor.
const BULK_NOTES: [(&str, &str); 3] = [
    ("4", "BulK item!"),
    ("5", "Another bulK item!"),
    ("6", "One more bulK item!"),
];

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// The stored body of a fetched note, or `null` when it is missing.
fn note_json(note: Option<&NoteDocument>) -> String {
    to_json(&note.map(NoteDocument::source))
}

/// The stored bodies of search hits as a JSON array.
fn notes_json(notes: &[NoteDocument]) -> String {
    to_json(&notes.iter().map(NoteDocument::source).collect::<Vec<_>>())
}

/// Values observed during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioReport {
    pub async_indexed: bool,
    pub first_note: Option<NoteDocument>,
    pub first_source: Option<NoteSource>,
    pub exists_before_delete: bool,
    pub exists_after_delete: bool,
    pub updated_note: Option<NoteDocument>,
    pub first_upsert: Option<NoteDocument>,
    pub second_upsert: Option<NoteDocument>,
    pub hits_before_bulk: Vec<NoteDocument>,
    pub hits_after_bulk: Vec<NoteDocument>,
}

/// Runs the demo sequence against a note store.
pub struct Scenario {
    store: Arc<dyn NoteStore>,
    refresh_wait: Duration,
}

impl Scenario {
    /// Create a scenario over the given store.
    ///
    /// `refresh_wait` is how long to pause after the bulk write so the new
    /// documents become visible to search.
    pub fn new(store: Arc<dyn NoteStore>, refresh_wait: Duration) -> Self {
        Self {
            store,
            refresh_wait,
        }
    }

    /// Execute every step in order.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<ScenarioReport, DemoError> {
        let mut report = ScenarioReport::default();

        self.index("1", "Hello!").await?;
        report.async_indexed = self.index_async("2", "Hi async!").await;

        report.first_note = self.get("1").await?;
        println!("{}", note_json(report.first_note.as_ref()));
        let source = self.get_source("1").await?;
        println!("{}", to_json(&source));
        report.first_source = Some(source);
        report.exists_before_delete = self.exists("1").await?;
        println!("{}", report.exists_before_delete);

        self.delete("1").await?;
        report.exists_after_delete = self.exists("1").await?;
        println!("{}", report.exists_after_delete);

        self.update("2", "Hi updated!").await?;
        report.updated_note = self.get("2").await?;
        println!("{}", note_json(report.updated_note.as_ref()));

        self.upsert("3", "Hi upserted!").await?;
        report.first_upsert = self.get("3").await?;
        println!("{}", note_json(report.first_upsert.as_ref()));

        self.upsert("3", "Hi upserted new!").await?;
        report.second_upsert = self.get("3").await?;
        println!("{}", note_json(report.second_upsert.as_ref()));

        report.hits_before_bulk = self.search_all().await?;
        println!("{}", notes_json(&report.hits_before_bulk));

        self.bulk_index(&BULK_NOTES).await;
        tokio::time::sleep(self.refresh_wait).await;

        report.hits_after_bulk = self.search_all().await?;
        println!("{}", notes_json(&report.hits_after_bulk));

        println!("OK!");
        info!("Demo sequence completed");
        Ok(report)
    }

    async fn index(&self, id: &str, text: &str) -> Result<(), DemoError> {
        let response = self.store.index(&NoteDocument::new(id, text)).await?;
        println!("INDEX RESPONSE: {}", response);
        Ok(())
    }

    /// Index in the background and block until the completion callback fires.
    ///
    /// Failures are printed and logged, never propagated.
    async fn index_async(&self, id: &str, text: &str) -> bool {
        let handle = index_async_with(
            self.store.clone(),
            NoteDocument::new(id, text),
            |result| match result {
                Ok(response) => println!("INDEX RESPONSE: {}", response),
                Err(e) => println!("INDEX FAILURE: {}", e),
            },
        );

        match handle.wait().await {
            Ok(_) => true,
            Err(e) => {
                warn!(id = %id, error = %e, "Async index did not succeed");
                false
            }
        }
    }

    async fn get(&self, id: &str) -> Result<Option<NoteDocument>, DemoError> {
        let response = self.store.get(id).await?;
        println!("GET RESPONSE: {}", response);
        Ok(response.into_document())
    }

    async fn get_source(&self, id: &str) -> Result<NoteSource, DemoError> {
        let source = self.store.get_source(id).await?;
        println!("GET SOURCE RESPONSE: {}", to_json(&source));
        Ok(source)
    }

    async fn exists(&self, id: &str) -> Result<bool, DemoError> {
        let exists = self.store.exists(id).await?;
        println!("EXISTS RESPONSE: {}", exists);
        Ok(exists)
    }

    async fn delete(&self, id: &str) -> Result<(), DemoError> {
        let response = self.store.delete(id).await?;
        println!("DELETE RESPONSE: {}", response);
        Ok(())
    }

    async fn update(&self, id: &str, text: &str) -> Result<(), DemoError> {
        let response = self.store.update(&NoteDocument::new(id, text)).await?;
        println!("UPDATE RESPONSE: {}", response);
        Ok(())
    }

    async fn upsert(&self, id: &str, text: &str) -> Result<(), DemoError> {
        let response = self.store.upsert(&NoteDocument::new(id, text)).await?;
        println!("UPSERT RESPONSE: {}", response);
        Ok(())
    }

    async fn search_all(&self) -> Result<Vec<NoteDocument>, DemoError> {
        let response = self.store.search_all().await?;
        println!("SEARCH RESPONSE: {}", response);
        Ok(response.documents())
    }

    async fn bulk_index(&self, notes: &[(&str, &str)]) {
        let mut processor = BulkProcessor::new(self.store.clone(), Arc::new(ConsoleBulkListener));
        for (id, text) in notes {
            processor
                .add(BulkOperation::Index(NoteDocument::new(*id, *text)))
                .await;
        }
        processor.flush().await;
    }
}
