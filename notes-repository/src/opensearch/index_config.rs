//! OpenSearch index configuration and mappings.
//!
//! This module defines the settings and mappings for the notes collection.

use serde_json::{json, Value};

use notes_shared::NOTES_INDEX;

/// Configuration of the collection the client works against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// The collection name.
    pub name: String,
    /// Primary shard count used when the collection is created.
    pub number_of_shards: u32,
    /// Replica count used when the collection is created.
    pub number_of_replicas: u32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            name: NOTES_INDEX.to_string(),
            number_of_shards: 1,
            number_of_replicas: 0,
        }
    }
}

impl IndexConfig {
    /// Create a config for the named collection with default sharding.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Get the settings and mappings body used to create the collection.
    ///
    /// Notes carry a single analyzed `text` field; the id lives in `_id`.
    pub fn index_settings(&self) -> Value {
        json!({
            "settings": {
                "number_of_shards": self.number_of_shards,
                "number_of_replicas": self.number_of_replicas
            },
            "mappings": {
                "properties": {
                    "text": {
                        "type": "text"
                    }
                }
            }
        })
    }
}
