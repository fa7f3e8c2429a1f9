//! Core of the travelblog document store: flat JSON collections behind a read-modify-write
//! contract.
//!
//! This crate provides:
//!
//! - **Records** ([`record`]) - Untyped JSON records and canonical record ids
//! - **Document traits** ([`document`]) - Typed views over records, with a derive macro
//! - **Sequence primitives** ([`sequence`]) - find/insert/update/delete over a loaded collection
//! - **Store backend abstraction** ([`backend`]) - Whole-collection load and save
//! - **Collections** ([`collection`]) - Locked load-mutate-save cycles for one collection
//! - **Document store** ([`store`]) - Entry point tying backend, locks and ids together
//! - **Error handling** ([`error`]) - Error kinds and result types
//!
//! # Example
//!
//! ```ignore
//! use travelblog_core::prelude::*;
//!
//! #[derive(Debug, Clone, Serialize, Deserialize, Document)]
//! #[document(collection = "posts")]
//! pub struct Post {
//!     pub id: RecordId,
//!     pub title: String,
//! }
//!
//! let store = DocumentStore::new(backend);
//! let post = store
//!     .typed_collection::<Post>()
//!     .insert(json!({ "title": "Lisbon" }).as_object().cloned().unwrap_or_default())
//!     .await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as travelblog_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod id;
pub mod lock;
pub mod prelude;
pub mod record;
pub mod sequence;
pub mod store;

pub use travelblog_macros::Document;
