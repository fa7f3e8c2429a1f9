//! Convenient re-exports of commonly used types.
//!
//! ```ignore
//! use travelblog_core::prelude::*;
//! ```

pub use crate::{
    backend::{StoreBackend, StoreBackendBuilder},
    collection::{Collection, TypedCollection},
    document::{Document, DocumentExt},
    error::{DocumentStoreError, DocumentStoreResult, ErrorKind},
    id::IdGenerator,
    record::{Record, RecordId},
    store::{DocumentStore, DynDocumentStore, IntoDynDocumentStore},
};

pub use serde::{Deserialize, Serialize};
pub use travelblog_macros::Document;
