//! # Notes Demo
//!
//! Exercises the document APIs of a search engine against the `notes`
//! collection: index, get, get-source, exists, delete, update, upsert, bulk,
//! search and async indexing, printing each response.
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`console`]: Bulk listener that prints batch outcomes
//! - [`scenario`]: The fixed operation sequence

pub mod config;
pub mod console;
pub mod scenario;

pub use config::{DemoConfig, Dependencies, LogFormat};
pub use scenario::{Scenario, ScenarioReport};

use thiserror::Error;

/// Errors that can occur during demo initialization or execution.
#[derive(Error, Debug)]
pub enum DemoError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] notes_repository::SearchError),
}

impl DemoError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
