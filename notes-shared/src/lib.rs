//! # Notes Shared
//!
//! Data types shared by the notes search client crates.

use serde::{Deserialize, Serialize};

/// The name of the collection every note lives in.
pub const NOTES_INDEX: &str = "notes";

/// The stored body of a note.
///
/// This is what the search engine keeps as the document `_source`. The note
/// id is carried separately as the engine's `_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSource {
    /// The note's text.
    pub text: String,
}

impl NoteSource {
    /// Create a source body with the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A note document: a unique id plus its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDocument {
    /// Unique key within the collection.
    pub id: String,
    /// The note's text.
    pub text: String,
}

impl NoteDocument {
    /// Create a new note document.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Build a document from an id and a stored source body.
    pub fn from_source(id: impl Into<String>, source: NoteSource) -> Self {
        Self {
            id: id.into(),
            text: source.text,
        }
    }

    /// The body sent to the engine for this document.
    pub fn source(&self) -> NoteSource {
        NoteSource::new(self.text.clone())
    }
}
