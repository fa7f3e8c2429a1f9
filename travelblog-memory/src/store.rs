//! In-memory storage implementation for document stores.
//!
//! Collections are held as record vectors in a HashMap behind an async-safe read-write lock.

use async_trait::async_trait;
use mea::rwlock::RwLock;
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

use travelblog_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{DocumentStoreError, DocumentStoreResult},
    record::Record,
};

type StoreMap = HashMap<String, Vec<Record>>;

/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, allowing it to be
/// shared across async tasks. Multiple clones of the same instance share the same data, which
/// lets tests keep a handle to inspect what a [`travelblog_core::store::DocumentStore`] wrote.
///
/// Like the file backend, loading a collection that was never created is an error.
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> records, in stored order
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for seeding collections before use.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    /// Returns a copy of a collection's current records, or `None` if it does not exist.
    pub async fn snapshot(&self, collection: &str) -> Option<Vec<Record>> {
        self.store.read().await.get(collection).cloned()
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn load(&self, collection: &str) -> DocumentStoreResult<Vec<Record>> {
        self.store
            .read()
            .await
            .get(collection)
            .cloned()
            .ok_or_else(|| DocumentStoreError::CollectionNotFound(collection.to_string()))
    }

    async fn save(&self, collection: &str, records: Vec<Record>) -> DocumentStoreResult<()> {
        debug!(collection, records = records.len(), "replacing in-memory collection");

        self.store
            .write()
            .await
            .insert(collection.to_string(), records);

        Ok(())
    }

    async fn create_collection(&self, name: &str) -> DocumentStoreResult<()> {
        self.store
            .write()
            .await
            .entry(name.to_string())
            .or_default();

        Ok(())
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        let mut names: Vec<String> = self.store.read().await.keys().cloned().collect();
        names.sort();

        Ok(names)
    }
}

/// Builder for constructing [`InMemoryStore`] instances with seeded collections.
///
/// # Example
///
/// ```ignore
/// use travelblog_memory::InMemoryStore;
/// use travelblog_core::backend::StoreBackendBuilder;
///
/// let store = InMemoryStore::builder()
///     .with_collection("posts", vec![])
///     .build()
///     .await?;
/// ```
#[derive(Default)]
pub struct InMemoryStoreBuilder {
    collections: StoreMap,
}

impl InMemoryStoreBuilder {
    /// Seeds a collection with records.
    pub fn with_collection(mut self, name: &str, records: Vec<Record>) -> Self {
        self.collections.insert(name.to_string(), records);
        self
    }

    /// Seeds a collection from JSON values, skipping anything that is not an object.
    pub fn with_json(self, name: &str, values: Vec<serde_json::Value>) -> Self {
        let records = values
            .into_iter()
            .filter_map(|v| Record::try_from(v).ok())
            .collect();

        self.with_collection(name, records)
    }
}

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] holding the seeded collections.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore {
            store: Arc::new(RwLock::new(self.collections)),
        })
    }
}
