//! Request and response types for note store operations.
//!
//! Responses mirror the JSON the engine returns so that printing one shows
//! what came back over the wire.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::SearchError;
use notes_shared::{NoteDocument, NoteSource};

/// Print the body the engine sent, or the typed fields when there is none.
fn write_json<T: Serialize>(f: &mut fmt::Formatter<'_>, raw: &Value, value: &T) -> fmt::Result {
    if !raw.is_null() {
        return write!(f, "{}", raw);
    }
    let json = serde_json::to_string(value).map_err(|_| fmt::Error)?;
    f.write_str(&json)
}

fn from_raw<T: serde::de::DeserializeOwned>(value: &Value) -> Result<T, SearchError> {
    T::deserialize(value).map_err(|e| SearchError::parse(e.to_string()))
}

/// Outcome reported by the engine for a single-document write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteResult {
    Created,
    Updated,
    Deleted,
    NotFound,
    Noop,
}

/// Shard acknowledgement counts attached to write responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardInfo {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub successful: u32,
    #[serde(default)]
    pub failed: u32,
}

/// Response to index, update, upsert and delete requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteResponse {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    pub result: WriteResult,
    #[serde(rename = "_shards", default)]
    pub shards: ShardInfo,
    /// The full body as received, including fields not modelled above.
    #[serde(skip)]
    pub raw: Value,
}

impl WriteResponse {
    /// Parse the engine's write response body, keeping it for printing.
    pub fn from_value(value: Value) -> Result<Self, SearchError> {
        let mut response: Self = from_raw(&value)?;
        response.raw = value;
        Ok(response)
    }
}

impl fmt::Display for WriteResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_json(f, &self.raw, self)
    }
}

/// Response to a get-by-id request.
///
/// A missing document is not an error: `found` is `false` and `source` is
/// empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetResponse {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    pub found: bool,
    #[serde(rename = "_source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<NoteSource>,
    #[serde(skip)]
    pub raw: Value,
}

impl GetResponse {
    /// Parse the engine's get response body, keeping it for printing.
    pub fn from_value(value: Value) -> Result<Self, SearchError> {
        let mut response: Self = from_raw(&value)?;
        response.raw = value;
        Ok(response)
    }

    /// The fetched document, if it exists.
    pub fn into_document(self) -> Option<NoteDocument> {
        if !self.found {
            return None;
        }
        let id = self.id;
        self.source.map(|source| NoteDocument::from_source(id, source))
    }
}

impl fmt::Display for GetResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_json(f, &self.raw, self)
    }
}

/// A single write inside a bulk request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkOperation {
    /// Index (create or replace) a document.
    Index(NoteDocument),
    /// Delete a document by id.
    Delete(String),
}

impl BulkOperation {
    /// The id of the document this operation targets.
    pub fn id(&self) -> &str {
        match self {
            Self::Index(doc) => &doc.id,
            Self::Delete(id) => id,
        }
    }

    /// The bulk action name used on the wire.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Index(_) => "index",
            Self::Delete(_) => "delete",
        }
    }

    /// Render the NDJSON lines for this operation against `index`.
    ///
    /// Index operations produce an action line followed by the source line;
    /// deletes produce only the action line.
    pub fn to_lines(&self, index: &str) -> Result<Vec<Value>, SearchError> {
        let mut action = serde_json::Map::new();
        action.insert(
            self.action().to_string(),
            serde_json::json!({ "_index": index, "_id": self.id() }),
        );
        let action = Value::Object(action);
        match self {
            Self::Index(doc) => {
                let source = serde_json::to_value(doc.source())
                    .map_err(|e| SearchError::SerializationError(e.to_string()))?;
                Ok(vec![action, source])
            }
            Self::Delete(_) => Ok(vec![action]),
        }
    }

    /// Approximate payload size in bytes, used for batching thresholds.
    pub fn estimated_size(&self) -> usize {
        // action line overhead plus the id
        let base = 48 + self.id().len();
        match self {
            Self::Index(doc) => base + doc.text.len() + 12,
            Self::Delete(_) => base,
        }
    }
}

/// Failure details for a single bulk item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkItemError {
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl fmt::Display for BulkItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{}: {}", self.error_type, reason),
            None => f.write_str(&self.error_type),
        }
    }
}

/// The outcome of one operation inside a bulk request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkItemResponse {
    pub action: String,
    #[serde(rename = "_id")]
    pub id: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<WriteResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<BulkItemError>,
}

impl BulkItemResponse {
    /// Whether the engine rejected this item.
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Deserialize)]
struct RawBulkItem {
    #[serde(rename = "_id", default)]
    id: Option<String>,
    #[serde(default)]
    status: u16,
    #[serde(default)]
    result: Option<WriteResult>,
    #[serde(default)]
    error: Option<BulkItemError>,
}

#[derive(Deserialize)]
struct RawBulkResponse {
    #[serde(default)]
    took: u64,
    #[serde(default)]
    errors: bool,
    #[serde(default)]
    items: Vec<BTreeMap<String, RawBulkItem>>,
}

/// Response to a bulk request, with one item per submitted operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkResponse {
    pub took: u64,
    pub errors: bool,
    pub items: Vec<BulkItemResponse>,
    #[serde(skip)]
    pub raw: Value,
}

impl BulkResponse {
    /// Assemble a response from item outcomes, e.g. after merging retries.
    pub fn new(took: u64, items: Vec<BulkItemResponse>) -> Self {
        Self {
            took,
            errors: items.iter().any(BulkItemResponse::is_failed),
            items,
            raw: Value::Null,
        }
    }

    /// Parse the engine's bulk response body.
    ///
    /// Each item arrives as a single-key object named after its action,
    /// e.g. `{"index": {...}}`.
    pub fn from_value(value: Value) -> Result<Self, SearchError> {
        let raw: RawBulkResponse = from_raw(&value)?;

        let items = raw
            .items
            .into_iter()
            .filter_map(|item| item.into_iter().next())
            .map(|(action, body)| BulkItemResponse {
                action,
                id: body.id.unwrap_or_default(),
                status: body.status,
                result: body.result,
                error: body.error,
            })
            .collect();

        Ok(Self {
            took: raw.took,
            errors: raw.errors,
            items,
            raw: value,
        })
    }

    /// Ids of the items the engine accepted.
    pub fn succeeded_ids(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| !item.is_failed())
            .map(|item| item.id.clone())
            .collect()
    }

    /// Ids of the items the engine rejected.
    pub fn failed_ids(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| item.is_failed())
            .map(|item| item.id.clone())
            .collect()
    }
}

impl fmt::Display for BulkResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_json(f, &self.raw, self)
    }
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<NoteSource>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTotal {
    Count(u64),
    Object { value: u64 },
}

#[derive(Deserialize)]
struct RawHits {
    #[serde(default)]
    total: Option<RawTotal>,
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct RawSearchResponse {
    #[serde(default)]
    took: u64,
    #[serde(default)]
    timed_out: bool,
    hits: RawHits,
}

/// Response to a search request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub took: u64,
    pub timed_out: bool,
    pub total: u64,
    pub hits: Vec<SearchHit>,
    #[serde(skip)]
    pub raw: Value,
}

impl SearchResponse {
    /// Parse the engine's search response body.
    ///
    /// Accepts both the object form of `hits.total` and the older bare number.
    pub fn from_value(value: Value) -> Result<Self, SearchError> {
        let raw: RawSearchResponse = from_raw(&value)?;

        let total = match raw.hits.total {
            Some(RawTotal::Count(count)) => count,
            Some(RawTotal::Object { value }) => value,
            None => raw.hits.hits.len() as u64,
        };

        Ok(Self {
            took: raw.took,
            timed_out: raw.timed_out,
            total,
            hits: raw.hits.hits,
            raw: value,
        })
    }

    /// The documents carried by the hits, skipping hits without a source.
    pub fn documents(&self) -> Vec<NoteDocument> {
        self.hits
            .iter()
            .filter_map(|hit| {
                hit.source
                    .clone()
                    .map(|source| NoteDocument::from_source(hit.id.clone(), source))
            })
            .collect()
    }
}

impl fmt::Display for SearchResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_json(f, &self.raw, self)
    }
}
