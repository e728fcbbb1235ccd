//! The [`DocumentStore`] trait: get, list and partial-update of JSON
//! documents.

use async_trait::async_trait;
use memoria_core::Result;
use serde_json::Value;

/// A document read from a collection listing.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// Last path segment of the document.
    pub id: String,
    pub data: Value,
}

/// How a single integer field is changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOp {
    /// Overwrite the field.
    Set(i64),
    /// Add to the field; a missing field counts as 0.
    Increment(i64),
}

/// One partial update: `field` (dot-separated) inside the document at `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldWrite {
    pub path: String,
    pub field: String,
    pub op: FieldOp,
}

impl FieldWrite {
    pub fn new(path: impl Into<String>, field: impl Into<String>, op: FieldOp) -> Self {
        Self {
            path: path.into(),
            field: field.into(),
            op,
        }
    }
}

/// Storage backend for memoria documents.
///
/// Implementations must give read-your-writes consistency per call. A call
/// to [`apply`](DocumentStore::apply) is all-or-nothing: if any target
/// document is missing, nothing is written and `Error::NotFound` is returned.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the document at `path`, or `None` if it does not exist.
    async fn get(&self, path: &str) -> Result<Option<Value>>;

    /// List every document directly inside `collection`, in insertion order.
    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>>;

    /// Apply all `writes` atomically.
    async fn apply(&self, writes: Vec<FieldWrite>) -> Result<()>;

    /// Create or replace the document at `path`.
    async fn put(&self, path: &str, data: Value) -> Result<()>;
}
