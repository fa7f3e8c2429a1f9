//! Collection handles for document store operations.
//!
//! A collection handle borrows the store's backend, write locks and id generator and exposes
//! the read-modify-write contract for one named collection:
//!
//! - reads load the whole collection and scan it;
//! - writes take the collection's write lock, load the whole collection, apply the change in
//!   memory and save the whole collection back, all before releasing the lock.
//!
//! A write whose mutation fails returns before anything is saved.
//!
//! # Collection Types
//!
//! - [`Collection`] - Untyped collection of [`Record`]s
//! - [`TypedCollection`] - Collection whose records are read and checked as a [`Document`] type
//!
//! # Example
//!
//! ```ignore
//! let posts = store.typed_collection::<Post>();
//! posts.insert(json!({ "title": "Lisbon" }).as_object().cloned().unwrap()).await?;
//! posts.modify(&RecordId::from("1"), |post| { post.title = "Porto".into(); Ok::<_, DocumentStoreError>(()) }).await?;
//! ```

use serde_json::{Map, Value};
use std::marker::PhantomData;
use tracing::debug;

use crate::{
    backend::StoreBackend,
    document::{Document, DocumentExt},
    error::{DocumentStoreError, DocumentStoreResult},
    id::IdGenerator,
    lock::WriteLocks,
    record::{Record, RecordId},
    sequence,
};

/// An untyped collection with a reference to a storage backend.
#[derive(Debug)]
pub struct Collection<'a, B: StoreBackend> {
    name: String,
    backend: &'a B,
    locks: &'a WriteLocks,
    ids: &'a IdGenerator,
}

impl<'a, B: StoreBackend> Collection<'a, B> {
    /// Creates a new collection reference (internal use).
    pub(crate) fn new(
        name: String,
        backend: &'a B,
        locks: &'a WriteLocks,
        ids: &'a IdGenerator,
    ) -> Self {
        Self { name, backend, locks, ids }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Loads every record of the collection, in stored order.
    pub async fn all(&self) -> DocumentStoreResult<Vec<Record>> {
        self.backend.load(&self.name).await
    }

    /// Loads the collection and returns the first record with the given id.
    pub async fn get(&self, id: &RecordId) -> DocumentStoreResult<Option<Record>> {
        let records = self.all().await?;

        Ok(sequence::find_by_id(&records, id).cloned())
    }

    /// Runs one read-modify-write cycle over the whole collection.
    ///
    /// The collection's write lock is held from before the load until after the save. If `f`
    /// fails, nothing is saved and its error is returned.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or a storage error from loading or saving.
    pub async fn transact<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Vec<Record>, &IdGenerator) -> Result<T, E> + Send,
        E: From<DocumentStoreError>,
    {
        let lock = self.locks.for_collection(&self.name).await;
        let _guard = lock.lock().await;

        let mut records = self.backend.load(&self.name).await?;
        let output = f(&mut records, self.ids)?;

        debug!(collection = %self.name, records = records.len(), "saving collection");
        self.backend.save(&self.name, records).await?;

        Ok(output)
    }

    /// Appends a new record built from `fields` and returns it with its assigned id.
    pub async fn insert(&self, fields: Map<String, Value>) -> DocumentStoreResult<Record> {
        self.transact(|records, ids| Ok(sequence::insert(records, fields, ids)))
            .await
    }

    /// Shallow-merges `fields` onto the record with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::DocumentNotFound`] if no record has the id.
    pub async fn update(
        &self,
        id: &RecordId,
        fields: Map<String, Value>,
    ) -> DocumentStoreResult<Record> {
        let name = self.name.clone();

        self.transact(move |records, _| sequence::update(records, id, fields, &name))
            .await
    }

    /// Removes the record with the given id, returning whether it existed.
    ///
    /// Deleting an absent id is not an error; the collection is left untouched.
    pub async fn delete(&self, id: &RecordId) -> DocumentStoreResult<bool> {
        let lock = self.locks.for_collection(&self.name).await;
        let _guard = lock.lock().await;

        let mut records = self.backend.load(&self.name).await?;

        if !sequence::delete(&mut records, id) {
            return Ok(false);
        }

        self.backend.save(&self.name, records).await?;
        Ok(true)
    }
}

/// A collection whose records are read, checked and mutated as documents of type `D`.
///
/// Writes are admitted only if the affected record still deserializes as `D`, passes
/// [`Document::validate`] and keeps every [`Document::unique_fields`] value unique.
#[derive(Debug)]
pub struct TypedCollection<'a, B: StoreBackend, D: Document> {
    inner: Collection<'a, B>,
    _marker: PhantomData<D>,
}

impl<'a, B: StoreBackend, D: Document> TypedCollection<'a, B, D> {
    pub(crate) fn new(inner: Collection<'a, B>) -> Self {
        Self { inner, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Returns the untyped view of this collection.
    pub fn untyped(&self) -> &Collection<'a, B> {
        &self.inner
    }

    /// Loads the collection and returns the document with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Serialization`] if the stored record does not have the
    /// shape of `D`.
    pub async fn get(&self, id: &RecordId) -> DocumentStoreResult<Option<D>> {
        self.inner
            .get(id)
            .await?
            .map(D::from_record)
            .transpose()
    }

    /// Loads every document of the collection, in stored order.
    pub async fn all(&self) -> DocumentStoreResult<Vec<D>> {
        self.inner
            .all()
            .await?
            .into_iter()
            .map(D::from_record)
            .collect()
    }

    /// Appends a new document built from `fields` and returns the stored record.
    ///
    /// The record is returned untyped so fields `D` does not model are not lost.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidDocument`] if the new record is not a valid `D`,
    /// or [`DocumentStoreError::Conflict`] if it repeats a unique value.
    pub async fn insert(&self, fields: Map<String, Value>) -> DocumentStoreResult<Record> {
        self.inner
            .transact(|records, ids| {
                let created = sequence::insert(records, fields, ids);
                admit::<D>(records, records.len() - 1, None)?;

                Ok(created)
            })
            .await
    }

    /// Shallow-merges `fields` onto the document with the given id and returns the stored
    /// record.
    ///
    /// The merged record is stored as merged; field order and unknown fields are untouched.
    pub async fn update(
        &self,
        id: &RecordId,
        fields: Map<String, Value>,
    ) -> DocumentStoreResult<Record> {
        let name = self.name().to_string();

        self.inner
            .transact(move |records, _| {
                let index = sequence::position_by_id(records, id).ok_or_else(|| {
                    DocumentStoreError::DocumentNotFound(id.to_string(), name.clone())
                })?;
                let previous = records[index].clone();

                let merged = sequence::update(records, id, fields, &name)?;
                admit::<D>(records, index, Some(&previous))?;

                Ok(merged)
            })
            .await
    }

    /// Applies `f` to the document with the given id and stores the result.
    ///
    /// The rewritten document is merged back onto the stored record, so existing fields keep
    /// their position and stored id. If `f` fails, nothing is saved.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::DocumentNotFound`] (converted into `E`) if the document
    /// does not exist, or the error returned by `f`.
    pub async fn modify<T, E, F>(&self, id: &RecordId, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut D) -> Result<T, E> + Send,
        E: From<DocumentStoreError>,
    {
        let name = self.name().to_string();

        self.inner
            .transact(move |records, _| {
                let index = sequence::position_by_id(records, id).ok_or_else(|| {
                    DocumentStoreError::DocumentNotFound(id.to_string(), name.clone())
                })?;

                let previous = records[index].clone();
                let mut document = D::from_record(previous.clone())?;
                let output = f(&mut document)?;

                records[index].merge(document.to_record()?.into_map());
                admit::<D>(records, index, Some(&previous))?;

                Ok(output)
            })
            .await
    }

    /// Removes the document with the given id, returning whether it existed.
    pub async fn delete(&self, id: &RecordId) -> DocumentStoreResult<bool> {
        self.inner.delete(id).await
    }
}

/// Checks that the record at `index` may be written as a `D`.
///
/// Unique fields are only compared when their value differs from `previous`, so records that
/// already share a value can still take writes to other fields.
fn admit<D: Document>(
    records: &[Record],
    index: usize,
    previous: Option<&Record>,
) -> DocumentStoreResult<D> {
    let candidate = &records[index];
    let document = D::from_json(Value::from(candidate.clone()))?;

    document.validate()?;

    for field in D::unique_fields() {
        let Some(value) = candidate.get(field).filter(|v| !v.is_null()) else {
            continue;
        };

        if previous.and_then(|p| p.get(field)) == Some(value) {
            continue;
        }

        let clash = records
            .iter()
            .enumerate()
            .any(|(i, other)| i != index && other.get(field) == Some(value));

        if clash {
            return Err(DocumentStoreError::Conflict(format!("{field} already exists")));
        }
    }

    Ok(document)
}
