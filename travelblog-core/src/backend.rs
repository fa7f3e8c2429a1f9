//! Storage backend abstraction for the document store.
//!
//! A backend owns the durable representation of named collections. It knows how to read a
//! whole collection into memory and how to replace it wholesale; everything id-keyed happens
//! on the loaded sequence (see [`crate::sequence`]).
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! The trait is object safe, so `Box<dyn StoreBackend>` is itself a backend and a store can
//! pick its backend at runtime.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::DocumentStoreResult, record::Record};

/// Abstract interface for document storage backends.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. They do not have to serialize writers themselves:
/// [`crate::store::DocumentStore`] holds a per-collection write lock around every
/// load-mutate-save cycle.
///
/// # Atomicity
///
/// [`StoreBackend::save`] must replace a collection as a unit. A concurrent
/// [`StoreBackend::load`] observes either the previous or the new sequence, never a mix.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Reads a whole collection, in stored order.
    ///
    /// # Errors
    ///
    /// Returns an error of kind [`crate::error::ErrorKind::StorageUnavailable`] if the
    /// collection is missing, unreadable, or not an array of JSON objects.
    async fn load(&self, collection: &str) -> DocumentStoreResult<Vec<Record>>;

    /// Replaces a whole collection with `records`, keeping their order.
    async fn save(&self, collection: &str, records: Vec<Record>) -> DocumentStoreResult<()>;

    /// Creates an empty collection unless one already exists.
    async fn create_collection(&self, name: &str) -> DocumentStoreResult<()>;

    /// Lists the names of all collections in the store.
    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>>;

    /// Releases backend resources. The default implementation is a no-op.
    async fn shutdown(&self) -> DocumentStoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl<B> StoreBackend for Box<B>
where
    B: StoreBackend + ?Sized,
{
    async fn load(&self, collection: &str) -> DocumentStoreResult<Vec<Record>> {
        (**self).load(collection).await
    }

    async fn save(&self, collection: &str, records: Vec<Record>) -> DocumentStoreResult<()> {
        (**self).save(collection, records).await
    }

    async fn create_collection(&self, name: &str) -> DocumentStoreResult<()> {
        (**self).create_collection(name).await
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        (**self).list_collections().await
    }

    async fn shutdown(&self) -> DocumentStoreResult<()> {
        (**self).shutdown().await
    }
}

/// Factory trait for creating backend instances.
///
/// # Example
///
/// ```ignore
/// let backend = JsonFileStore::builder("./data").create_missing(true).build().await?;
/// ```
#[async_trait]
pub trait StoreBackendBuilder: Send {
    /// The type of backend this builder produces.
    type Backend: StoreBackend;

    /// Builds the backend instance.
    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
