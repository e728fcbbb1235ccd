//! Test double that records writes and can be told to fail.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use memoria_core::{Error, Result};

use crate::store::{DocumentStore, FieldWrite, StoredDocument};

/// Wraps another store, logging every `apply` batch and optionally failing
/// `list` or `apply` calls with a database error.
pub struct RecordingStore<S> {
    inner: S,
    batches: Mutex<Vec<Vec<FieldWrite>>>,
    fail_list: Mutex<bool>,
    fail_apply: Mutex<bool>,
}

impl<S: DocumentStore> RecordingStore<S> {
    pub fn new(inner: S) -> Arc<Self> {
        Arc::new(Self {
            inner,
            batches: Mutex::new(Vec::new()),
            fail_list: Mutex::new(false),
            fail_apply: Mutex::new(false),
        })
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Every batch passed to `apply`, including failed ones.
    pub fn batches(&self) -> Vec<Vec<FieldWrite>> {
        self.batches.lock().clone()
    }

    /// All writes across batches, flattened.
    pub fn writes(&self) -> Vec<FieldWrite> {
        self.batches.lock().iter().flatten().cloned().collect()
    }

    pub fn fail_list(&self, fail: bool) {
        *self.fail_list.lock() = fail;
    }

    pub fn fail_apply(&self, fail: bool) {
        *self.fail_apply.lock() = fail;
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for RecordingStore<S> {
    async fn get(&self, path: &str) -> Result<Option<Value>> {
        self.inner.get(path).await
    }

    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>> {
        if *self.fail_list.lock() {
            return Err(Error::database("injected list failure"));
        }
        self.inner.list(collection).await
    }

    async fn apply(&self, writes: Vec<FieldWrite>) -> Result<()> {
        self.batches.lock().push(writes.clone());
        if *self.fail_apply.lock() {
            return Err(Error::database("injected apply failure"));
        }
        self.inner.apply(writes).await
    }

    async fn put(&self, path: &str, data: Value) -> Result<()> {
        self.inner.put(path, data).await
    }
}
