//! Interface definitions for the note store.
//!
//! This module defines the abstract `NoteStore` trait that allows for
//! dependency injection and swappable search backend implementations.

mod note_store;

pub use note_store::NoteStore;
