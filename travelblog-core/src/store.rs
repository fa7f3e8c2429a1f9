//! Main document store interface.
//!
//! - [`DocumentStore`] - store bound to a specific backend type
//! - [`DynDocumentStore`] - store over a boxed backend chosen at runtime
//!
//! # Example
//!
//! ```ignore
//! use travelblog_core::prelude::*;
//!
//! let store = DocumentStore::new(backend).into_dyn();
//! let users = store.typed_collection::<User>();
//! let ana = users.get(&RecordId::from("1")).await?;
//! ```

use tracing::info;

use crate::{
    backend::StoreBackend,
    collection::{Collection, TypedCollection},
    document::Document,
    error::DocumentStoreResult,
    id::IdGenerator,
    lock::WriteLocks,
};

/// A document store bound to a backend.
///
/// The store owns the per-collection write locks and the id generator, so every collection
/// handle obtained from the same store serializes its writes against the others and draws
/// ids from one sequence.
#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
    locks: WriteLocks,
    ids: IdGenerator,
}

/// A document store whose backend is selected at runtime.
pub type DynDocumentStore = DocumentStore<Box<dyn StoreBackend>>;

impl<B: StoreBackend> DocumentStore<B> {
    /// Creates a new document store with the given backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            locks: WriteLocks::new(),
            ids: IdGenerator::new(),
        }
    }

    /// Gets a typed collection for the specified document type.
    ///
    /// The collection name is determined by the document type's `collection_name()` method.
    pub fn typed_collection<D: Document>(&self) -> TypedCollection<'_, B, D> {
        TypedCollection::new(self.collection(D::collection_name()))
    }

    /// Gets an untyped collection with the given name.
    pub fn collection(&self, name: &str) -> Collection<'_, B> {
        Collection::new(name.to_string(), &self.backend, &self.locks, &self.ids)
    }

    /// Returns the id generator shared by all collections of this store.
    ///
    /// Sub-records (comments, itineraries) draw their ids from it too.
    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    /// Creates an empty collection unless it already exists.
    pub async fn create_collection(&self, name: &str) -> DocumentStoreResult<()> {
        self.backend.create_collection(name).await
    }

    /// Lists all collections in the store.
    pub async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        self.backend.list_collections().await
    }

    /// Shuts down the store and releases backend resources.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        info!("shutting down document store");
        self.backend.shutdown().await
    }
}

/// Conversion trait for converting a document store into a [`DynDocumentStore`].
pub trait IntoDynDocumentStore {
    /// Converts this store into a dynamically dispatched store.
    ///
    /// Write locks and the id generator carry over.
    fn into_dyn(self) -> DynDocumentStore;
}

impl<B: StoreBackend + 'static> IntoDynDocumentStore for DocumentStore<B> {
    fn into_dyn(self) -> DynDocumentStore {
        DocumentStore {
            backend: Box::new(self.backend),
            locks: self.locks,
            ids: self.ids,
        }
    }
}
