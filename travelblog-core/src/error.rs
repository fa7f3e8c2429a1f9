//! Error types and result types for document store operations.
//!
//! Every fallible store operation returns [`DocumentStoreResult<T>`]. Callers that need to
//! translate failures into another surface (HTTP statuses, exit codes) should branch on
//! [`DocumentStoreError::kind`] rather than on individual variants.

use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a document store.
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// A collection file or payload could not be converted to or from JSON records.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error during store initialization (creating data directories, seeding files).
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// The requested document was not found in the collection.
    /// The first argument is the document ID, the second is the collection name.
    #[error("Document not found {0} in collection {1}")]
    DocumentNotFound(String, String),
    /// The requested collection does not exist in the store.
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),
    /// The document violates schema constraints or has invalid structure.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// A write was rejected because it clashes with existing state.
    #[error("Conflict: {0}")]
    Conflict(String),
    /// The backing storage could not be read or written.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// Coarse classification of a [`DocumentStoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A record, or the parent of a sub-record, is absent.
    NotFound,
    /// The write clashes with existing data (duplicate key, favorite already present).
    Conflict,
    /// The collection could not be loaded or persisted.
    StorageUnavailable,
    /// The supplied record or payload is malformed.
    ValidationFailure,
}

impl DocumentStoreError {
    /// Returns the kind of failure this error represents.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DocumentStoreError::DocumentNotFound(..) => ErrorKind::NotFound,
            DocumentStoreError::Conflict(_) => ErrorKind::Conflict,
            DocumentStoreError::InvalidDocument(_) => ErrorKind::ValidationFailure,
            DocumentStoreError::Serialization(_)
            | DocumentStoreError::Initialization(_)
            | DocumentStoreError::CollectionNotFound(_)
            | DocumentStoreError::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
        }
    }
}

/// A specialized `Result` type for document store operations.
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl From<SerdeJsonError> for DocumentStoreError {
    fn from(err: SerdeJsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}

impl From<IoError> for DocumentStoreError {
    fn from(err: IoError) -> Self {
        DocumentStoreError::StorageUnavailable(err.to_string())
    }
}
